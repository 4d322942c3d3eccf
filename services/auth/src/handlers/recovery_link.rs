use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::domain::types::SessionTokens;
use crate::error::AuthServiceError;
use crate::handlers::otp::MessageResponse;
use crate::state::AppState;
use crate::usecase::recovery_link::{
    RequestRecoveryLinkInput, RequestRecoveryLinkUseCase, VerifyRecoveryLinkUseCase,
    reset_page_url,
};

pub const LINK_REQUESTED_MESSAGE: &str =
    "If an account exists with this email, a reset link has been sent.";

// ── POST /auth/password-reset/link ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestLinkRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn request_link(
    State(state): State<AppState>,
    Json(body): Json<RequestLinkRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = RequestRecoveryLinkUseCase {
        users: state.user_port(),
        sessions: state.session_port(),
        tokens: state.recovery_token_repo(),
        mailer: state.mailer(),
        site_url: state.site_url.clone(),
        ttl: state.recovery_link_ttl,
    };
    usecase
        .execute(RequestRecoveryLinkInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: LINK_REQUESTED_MESSAGE,
    }))
}

// ── GET /auth/password-reset/link?token= ─────────────────────────────────────

#[derive(Deserialize)]
pub struct LinkQuery {
    #[serde(default)]
    pub token: String,
}

/// Bounce to the site's reset page. Never touches the token, so link
/// scanners that prefetch it cannot burn it.
pub async fn follow_link(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Redirect, AuthServiceError> {
    if query.token.is_empty() {
        return Err(AuthServiceError::MissingData("token is required"));
    }
    let url = reset_page_url(&state.site_url, &query.token)?;
    Ok(Redirect::to(url.as_str()))
}

// ── POST /auth/password-reset/link/verify ────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyLinkRequest {
    #[serde(default)]
    pub token: String,
}

pub async fn verify_link(
    State(state): State<AppState>,
    Json(body): Json<VerifyLinkRequest>,
) -> Result<Json<SessionTokens>, AuthServiceError> {
    let usecase = VerifyRecoveryLinkUseCase {
        tokens: state.recovery_token_repo(),
        sessions: state.session_port(),
    };
    let tokens = usecase.execute(&body.token).await?;
    Ok(Json(tokens))
}
