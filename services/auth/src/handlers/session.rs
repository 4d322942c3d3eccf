use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;

use crate::domain::types::SessionTokens;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::RefreshSessionUseCase;

// ── GET /auth/session ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms_opt")]
    pub expires_at: Option<DateTime<Utc>>,
}

pub async fn current_session(identity: Identity) -> Json<SessionResponse> {
    let expires_at = i64::try_from(identity.access_token_exp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    Json(SessionResponse {
        user_id: identity.user_id,
        email: identity.email,
        expires_at,
    })
}

// ── POST /auth/session/refresh ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RefreshSessionRequest {
    #[serde(default)]
    pub refresh_token: String,
}

pub async fn refresh_session(
    State(state): State<AppState>,
    Json(body): Json<RefreshSessionRequest>,
) -> Result<Json<SessionTokens>, AuthServiceError> {
    let usecase = RefreshSessionUseCase {
        sessions: state.session_port(),
    };
    let tokens = usecase.execute(&body.refresh_token).await?;
    Ok(Json(tokens))
}
