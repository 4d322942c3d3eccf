use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use compost_auth_types::identity::AccessTokenSecret;

use crate::infra::db::{
    DbBinLogRepository, DbBinRepository, DbForumRepository, DbProfileRepository,
    DbTaskRepository, DbTipRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: AccessTokenSecret,
}

impl AppState {
    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn bin_repo(&self) -> DbBinRepository {
        DbBinRepository {
            db: self.db.clone(),
        }
    }

    pub fn log_repo(&self) -> DbBinLogRepository {
        DbBinLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn task_repo(&self) -> DbTaskRepository {
        DbTaskRepository {
            db: self.db.clone(),
        }
    }

    pub fn forum_repo(&self) -> DbForumRepository {
        DbForumRepository {
            db: self.db.clone(),
        }
    }

    pub fn tip_repo(&self) -> DbTipRepository {
        DbTipRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for AccessTokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
