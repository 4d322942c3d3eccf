use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;
use compost_domain::activity::LogKind;
use compost_domain::bin::MoistureLevel;

use crate::domain::types::BinLog;
use crate::error::CompostServiceError;
use crate::handlers::bin::BinResponse;
use crate::handlers::{PageQuery, parse_query};
use crate::state::AppState;
use crate::usecase::log::{CreateLogInput, CreateLogUseCase, ListLogsUseCase};

#[derive(Serialize)]
pub struct LogResponse {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub user_id: Uuid,
    pub kind: LogKind,
    pub temperature_c: Option<f64>,
    pub moisture: Option<MoistureLevel>,
    pub notes: Option<String>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<BinLog> for LogResponse {
    fn from(log: BinLog) -> Self {
        Self {
            id: log.id,
            bin_id: log.bin_id,
            user_id: log.user_id,
            kind: log.kind,
            temperature_c: log.temperature_c,
            moisture: log.moisture,
            notes: log.notes,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CreatedLogResponse {
    #[serde(flatten)]
    pub log: LogResponse,
    /// The bin after its readings were refreshed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<BinResponse>,
}

// ── GET /bins/{id}/logs ──────────────────────────────────────────────────────

pub async fn list_logs(
    _identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<LogResponse>>, CompostServiceError> {
    let query: PageQuery = parse_query(raw_query)?;
    let usecase = ListLogsUseCase {
        bins: state.bin_repo(),
        logs: state.log_repo(),
    };
    let logs = usecase.execute(bin_id, query.page_request()).await?;
    Ok(Json(logs.into_iter().map(LogResponse::from).collect()))
}

// ── POST /bins/{id}/logs ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateLogRequest {
    #[serde(default)]
    pub kind: String,
    pub temperature_c: Option<f64>,
    pub moisture: Option<String>,
    pub notes: Option<String>,
}

pub async fn create_log(
    identity: Identity,
    State(state): State<AppState>,
    Path(bin_id): Path<Uuid>,
    Json(body): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<CreatedLogResponse>), CompostServiceError> {
    let usecase = CreateLogUseCase {
        bins: state.bin_repo(),
        logs: state.log_repo(),
    };
    let created = usecase
        .execute(
            identity.user_id,
            bin_id,
            CreateLogInput {
                kind: body.kind,
                temperature_c: body.temperature_c,
                moisture: body.moisture,
                notes: body.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedLogResponse {
            log: created.log.into(),
            bin: created.bin.map(BinResponse::from),
        }),
    ))
}
