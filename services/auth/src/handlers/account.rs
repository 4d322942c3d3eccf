use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use compost_auth_types::identity::Identity;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{DeleteAccountUseCase, UpdatePasswordInput, UpdatePasswordUseCase};

// ── PUT /auth/password ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub password: String,
}

pub async fn update_password(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = UpdatePasswordUseCase {
        sessions: state.session_port(),
    };
    usecase
        .execute(UpdatePasswordInput {
            access_token: identity.access_token,
            password: body.password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /auth/account ─────────────────────────────────────────────────────

pub async fn delete_account(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = DeleteAccountUseCase {
        sessions: state.session_port(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
