use axum::{
    Json,
    extract::{RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;

use crate::domain::types::Tip;
use crate::error::CompostServiceError;
use crate::handlers::{PageQuery, parse_query};
use crate::state::AppState;
use crate::usecase::tip::{CreateTipInput, CreateTipUseCase, ListTipsUseCase};

#[derive(Serialize)]
pub struct TipResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Tip> for TipResponse {
    fn from(t: Tip) -> Self {
        Self {
            id: t.id,
            author_id: t.author_id,
            title: t.title,
            content: t.content,
            created_at: t.created_at,
        }
    }
}

// ── GET /tips ────────────────────────────────────────────────────────────────

pub async fn list_tips(
    _identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<TipResponse>>, CompostServiceError> {
    let query: PageQuery = parse_query(raw_query)?;
    let usecase = ListTipsUseCase {
        repo: state.tip_repo(),
    };
    let tips = usecase.execute(query.page_request()).await?;
    Ok(Json(tips.into_iter().map(TipResponse::from).collect()))
}

// ── POST /tips ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTipRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub async fn create_tip(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateTipRequest>,
) -> Result<(StatusCode, Json<TipResponse>), CompostServiceError> {
    let usecase = CreateTipUseCase {
        repo: state.tip_repo(),
    };
    let tip = usecase
        .execute(
            identity.user_id,
            CreateTipInput {
                title: body.title,
                content: body.content,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tip.into())))
}
