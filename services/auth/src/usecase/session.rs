use uuid::Uuid;

use crate::domain::repository::SessionPort;
use crate::domain::types::{MIN_PASSWORD_LEN, SessionTokens};
use crate::error::AuthServiceError;

pub struct RefreshSessionUseCase<S: SessionPort> {
    pub sessions: S,
}

impl<S: SessionPort> RefreshSessionUseCase<S> {
    pub async fn execute(&self, refresh_token: &str) -> Result<SessionTokens, AuthServiceError> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(AuthServiceError::MissingData("refresh_token is required"));
        }
        self.sessions.refresh_session(refresh_token).await
    }
}

pub struct UpdatePasswordInput {
    pub access_token: String,
    pub password: String,
}

/// Final step of either reset flow: the caller holds a fresh session and
/// chooses a new password.
pub struct UpdatePasswordUseCase<S: SessionPort> {
    pub sessions: S,
}

impl<S: SessionPort> UpdatePasswordUseCase<S> {
    pub async fn execute(&self, input: UpdatePasswordInput) -> Result<(), AuthServiceError> {
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::WeakPassword);
        }
        self.sessions
            .update_password(&input.access_token, &input.password)
            .await
    }
}

pub struct DeleteAccountUseCase<S: SessionPort> {
    pub sessions: S,
}

impl<S: SessionPort> DeleteAccountUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.sessions.delete_user(user_id).await?;
        tracing::info!(%user_id, "account deleted");
        Ok(())
    }
}
