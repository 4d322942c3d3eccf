use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::domain::types::SessionTokens;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

/// Same body whether or not the account exists.
pub const OTP_REQUESTED_MESSAGE: &str =
    "If an account exists with this email, a reset code has been sent.";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/password-reset/otp ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestOtpRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = RequestOtpUseCase {
        users: state.user_port(),
        otps: state.otp_repo(),
        mailer: state.mailer(),
        ttl: state.otp_ttl,
    };
    usecase
        .execute(RequestOtpInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: OTP_REQUESTED_MESSAGE,
    }))
}

// ── POST /auth/password-reset/otp/verify ─────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<SessionTokens>, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        users: state.user_port(),
        otps: state.otp_repo(),
        sessions: state.session_port(),
    };
    let tokens = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok(Json(tokens))
}
