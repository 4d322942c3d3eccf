use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use compost_auth_types::identity::Identity;
use compost_domain::task::{TaskStatus, TaskUrgency};

use crate::domain::types::{Task, TaskFilter};
use crate::error::CompostServiceError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::task::{
    AcceptTaskUseCase, CompleteTaskUseCase, CreateTaskInput, CreateTaskUseCase, DeleteTaskUseCase,
    ListTasksUseCase,
};

#[derive(Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub bin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub urgency: TaskUrgency,
    pub status: TaskStatus,
    pub created_by: Uuid,
    pub accepted_by: Option<Uuid>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms_opt")]
    pub accepted_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms_opt")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<chrono::NaiveDate>,
    #[serde(serialize_with = "compost_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            bin_id: t.bin_id,
            title: t.title,
            description: t.description,
            urgency: t.urgency,
            status: t.status,
            created_by: t.created_by,
            accepted_by: t.accepted_by,
            accepted_at: t.accepted_at,
            completed_at: t.completed_at,
            due_date: t.due_date,
            created_at: t.created_at,
        }
    }
}

fn parse_bin_id(raw: &str) -> Result<Uuid, CompostServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| CompostServiceError::validation("bin_id must be a UUID"))
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct TaskListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    #[serde(alias = "bin_id")]
    pub bin_id: Option<String>,
    pub status: Option<String>,
}

impl TaskListQuery {
    /// Blank values mean "no filter".
    fn filter(&self) -> Result<TaskFilter, CompostServiceError> {
        let bin_id = match self.bin_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_bin_id(raw)?),
        };
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<TaskStatus>()?),
        };
        Ok(TaskFilter { bin_id, status })
    }
}

// ── GET /tasks ───────────────────────────────────────────────────────────────

pub async fn list_tasks(
    _identity: Identity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<TaskResponse>>, CompostServiceError> {
    let query: TaskListQuery = parse_query(raw_query)?;
    let filter = query.filter()?;
    let page = compost_domain::pagination::PageRequest::from_query(query.per_page, query.page);
    let usecase = ListTasksUseCase {
        tasks: state.task_repo(),
    };
    let tasks = usecase.execute(filter, page).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

// ── POST /tasks ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub bin_id: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub due_date: Option<String>,
}

pub async fn create_task(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), CompostServiceError> {
    let usecase = CreateTaskUseCase {
        bins: state.bin_repo(),
        tasks: state.task_repo(),
    };
    let task = usecase
        .execute(
            identity.user_id,
            CreateTaskInput {
                bin_id: parse_bin_id(&body.bin_id)?,
                title: body.title,
                description: body.description,
                urgency: body.urgency,
                due_date: body.due_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

// ── POST /tasks/{id}/accept ──────────────────────────────────────────────────

pub async fn accept_task(
    identity: Identity,
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, CompostServiceError> {
    let usecase = AcceptTaskUseCase {
        bins: state.bin_repo(),
        tasks: state.task_repo(),
    };
    let task = usecase.execute(identity.user_id, task_id).await?;
    Ok(Json(task.into()))
}

// ── POST /tasks/{id}/complete ────────────────────────────────────────────────

pub async fn complete_task(
    identity: Identity,
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>, CompostServiceError> {
    let usecase = CompleteTaskUseCase {
        tasks: state.task_repo(),
    };
    let task = usecase.execute(identity.user_id, task_id).await?;
    Ok(Json(task.into()))
}

// ── DELETE /tasks/{id} ───────────────────────────────────────────────────────

pub async fn delete_task(
    identity: Identity,
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode, CompostServiceError> {
    let usecase = DeleteTaskUseCase {
        tasks: state.task_repo(),
    };
    usecase.execute(identity.user_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
