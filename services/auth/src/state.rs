use axum::extract::FromRef;
use chrono::Duration;
use sea_orm::DatabaseConnection;
use url::Url;

use compost_auth_types::identity::AccessTokenSecret;

#[cfg(feature = "legacy-link-reset")]
use crate::infra::db::DbRecoveryTokenRepository;
use crate::infra::backend::BackendAuthClient;
use crate::infra::db::DbOtpRepository;
use crate::infra::mailer::ResendMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub backend: BackendAuthClient,
    pub mailer: ResendMailer,
    pub jwt_secret: AccessTokenSecret,
    pub site_url: Url,
    pub otp_ttl: Duration,
    pub recovery_link_ttl: Duration,
}

impl AppState {
    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    #[cfg(feature = "legacy-link-reset")]
    pub fn recovery_token_repo(&self) -> DbRecoveryTokenRepository {
        DbRecoveryTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_port(&self) -> BackendAuthClient {
        self.backend.clone()
    }

    pub fn session_port(&self) -> BackendAuthClient {
        self.backend.clone()
    }

    pub fn mailer(&self) -> ResendMailer {
        self.mailer.clone()
    }
}

impl FromRef<AppState> for AccessTokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
