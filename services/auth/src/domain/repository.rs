#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "legacy-link-reset")]
use crate::domain::types::PasswordResetToken;
use crate::domain::types::{
    Account, EmailMessage, PasswordResetOtp, RecoveryToken, SessionTokens,
};
use crate::error::AuthServiceError;

/// Port for looking up accounts held by the auth provider.
pub trait UserPort: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError>;
}

/// Port for session operations delegated to the auth provider.
pub trait SessionPort: Send + Sync {
    /// Mint a single-use recovery token for the account (admin API).
    async fn generate_recovery_token(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<RecoveryToken, AuthServiceError>;

    /// Redeem a recovery token for a session.
    async fn exchange_recovery_token(
        &self,
        token_hash: &str,
    ) -> Result<SessionTokens, AuthServiceError>;

    /// Refresh-token grant. Rejection maps to `InvalidRefreshToken`.
    async fn refresh_session(&self, refresh_token: &str)
    -> Result<SessionTokens, AuthServiceError>;

    /// Set a new password acting as the token's owner.
    async fn update_password(
        &self,
        access_token: &str,
        password: &str,
    ) -> Result<(), AuthServiceError>;

    /// Remove the account (admin API). Deleting an absent account succeeds.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthServiceError>;
}

/// Outgoing email delivery.
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), AuthServiceError>;
}

/// Repository for password-reset codes.
pub trait OtpRepository: Send + Sync {
    /// Insert or overwrite the code for `otp.email`, clearing `used_at`.
    async fn upsert(&self, otp: &PasswordResetOtp) -> Result<(), AuthServiceError>;

    /// Newest unused, unexpired row matching email + code.
    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError>;

    /// Newest row matching email + code regardless of state. Used to explain
    /// why a code was rejected.
    async fn find_latest_by_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<PasswordResetOtp>, AuthServiceError>;

    /// Set `used_at` only if the row is still unused. Returns `false` when the
    /// code was already consumed or replaced by a newer request.
    async fn mark_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError>;
}

/// Repository for recovery tokens handed out by the email-link reset.
#[cfg(feature = "legacy-link-reset")]
pub trait RecoveryTokenRepository: Send + Sync {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), AuthServiceError>;

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, AuthServiceError>;

    /// Set `used_at` if still unset. Returns `false` when another request
    /// consumed the token first.
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AuthServiceError>;
}
