use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use compost_core::error::error_response;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("{0}")]
    MissingData(&'static str),
    #[error("invalid code")]
    InvalidOtp,
    #[error("code expired")]
    OtpExpired,
    #[error("code already used")]
    OtpAlreadyUsed,
    #[cfg(feature = "legacy-link-reset")]
    #[error("invalid or expired reset link")]
    InvalidToken,
    #[error("password must be at least 6 characters")]
    WeakPassword,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("session expired")]
    InvalidSession,
    #[error("failed to create session")]
    SessionCreationFailed(#[source] anyhow::Error),
    #[error("upstream service error")]
    Upstream(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingData(_) => "MISSING_DATA",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::OtpAlreadyUsed => "OTP_ALREADY_USED",
            #[cfg(feature = "legacy-link-reset")]
            Self::InvalidToken => "INVALID_TOKEN",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::InvalidSession => "INVALID_SESSION",
            Self::SessionCreationFailed(_) => "SESSION_CREATION_FAILED",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail
            | Self::MissingData(_)
            | Self::InvalidOtp
            | Self::OtpExpired
            | Self::OtpAlreadyUsed
            | Self::WeakPassword => StatusCode::BAD_REQUEST,
            #[cfg(feature = "legacy-link-reset")]
            Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::InvalidRefreshToken | Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::SessionCreationFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // TraceLayer records every request; only server-side failures need the cause chain.
        match &self {
            Self::SessionCreationFailed(e) => {
                tracing::error!(error = %e, kind = self.kind(), "session exchange failed")
            }
            Self::Upstream(e) => tracing::error!(error = %e, kind = "UPSTREAM", "upstream error"),
            Self::Internal(e) => tracing::error!(error = %e, kind = "INTERNAL", "internal error"),
            _ => {}
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
