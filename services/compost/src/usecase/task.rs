use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use compost_domain::pagination::PageRequest;
use compost_domain::task::{TaskStatus, TaskUrgency};

use crate::domain::repository::{BinRepository, TaskRepository};
use crate::domain::types::{TITLE_MAX_LEN, Task, TaskFilter, normalize_optional};
use crate::error::CompostServiceError;
use crate::usecase::bin::ensure_member;
use crate::usecase::required_text;

async fn find_task<T: TaskRepository>(tasks: &T, id: Uuid) -> Result<Task, CompostServiceError> {
    tasks
        .find_by_id(id)
        .await?
        .ok_or(CompostServiceError::TaskNotFound)
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, CompostServiceError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CompostServiceError::validation("due_date must be YYYY-MM-DD"))
}

// ── ListTasks ────────────────────────────────────────────────────────────────

pub struct ListTasksUseCase<T: TaskRepository> {
    pub tasks: T,
}

impl<T: TaskRepository> ListTasksUseCase<T> {
    pub async fn execute(
        &self,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Vec<Task>, CompostServiceError> {
        self.tasks.list(filter, page.clamped()).await
    }
}

// ── CreateTask ───────────────────────────────────────────────────────────────

pub struct CreateTaskInput {
    pub bin_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub urgency: Option<String>,
    pub due_date: Option<String>,
}

pub struct CreateTaskUseCase<B: BinRepository, T: TaskRepository> {
    pub bins: B,
    pub tasks: T,
}

impl<B: BinRepository, T: TaskRepository> CreateTaskUseCase<B, T> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateTaskInput,
    ) -> Result<Task, CompostServiceError> {
        let title = required_text(&input.title, "title", TITLE_MAX_LEN)?;
        let urgency = match input.urgency.as_deref().map(str::trim) {
            None | Some("") => TaskUrgency::default(),
            Some(raw) => raw.parse()?,
        };
        let due_date = match input.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_due_date(raw)?),
        };

        ensure_member(&self.bins, input.bin_id, user_id).await?;

        let task = Task {
            id: Uuid::now_v7(),
            bin_id: input.bin_id,
            title,
            description: normalize_optional(input.description),
            urgency,
            status: TaskStatus::Open,
            created_by: user_id,
            accepted_by: None,
            accepted_at: None,
            completed_at: None,
            due_date,
            created_at: Utc::now(),
        };
        self.tasks.create(&task).await?;
        Ok(task)
    }
}

// ── AcceptTask ───────────────────────────────────────────────────────────────

pub struct AcceptTaskUseCase<B: BinRepository, T: TaskRepository> {
    pub bins: B,
    pub tasks: T,
}

impl<B: BinRepository, T: TaskRepository> AcceptTaskUseCase<B, T> {
    pub async fn execute(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, CompostServiceError> {
        let task = find_task(&self.tasks, task_id).await?;
        ensure_member(&self.bins, task.bin_id, user_id).await?;
        if !task.status.can_transition_to(TaskStatus::Accepted) {
            return Err(CompostServiceError::TaskStateConflict(task.status));
        }

        let now = Utc::now();
        if !self.tasks.mark_accepted(task_id, user_id, now).await? {
            // Lost the race against another volunteer.
            let current = find_task(&self.tasks, task_id).await?;
            return Err(CompostServiceError::TaskStateConflict(current.status));
        }
        tracing::info!(task_id = %task_id, accepted_by = %user_id, "task accepted");
        Ok(Task {
            status: TaskStatus::Accepted,
            accepted_by: Some(user_id),
            accepted_at: Some(now),
            ..task
        })
    }
}

// ── CompleteTask ─────────────────────────────────────────────────────────────

pub struct CompleteTaskUseCase<T: TaskRepository> {
    pub tasks: T,
}

impl<T: TaskRepository> CompleteTaskUseCase<T> {
    pub async fn execute(&self, user_id: Uuid, task_id: Uuid) -> Result<Task, CompostServiceError> {
        let task = find_task(&self.tasks, task_id).await?;
        if !task.status.can_transition_to(TaskStatus::Completed) {
            return Err(CompostServiceError::TaskStateConflict(task.status));
        }
        if task.accepted_by != Some(user_id) {
            return Err(CompostServiceError::NotTaskAcceptor);
        }

        let now = Utc::now();
        if !self.tasks.mark_completed(task_id, now).await? {
            return Err(CompostServiceError::TaskStateConflict(TaskStatus::Completed));
        }
        tracing::info!(task_id = %task_id, "task completed");
        Ok(Task {
            status: TaskStatus::Completed,
            completed_at: Some(now),
            ..task
        })
    }
}

// ── DeleteTask ───────────────────────────────────────────────────────────────

pub struct DeleteTaskUseCase<T: TaskRepository> {
    pub tasks: T,
}

impl<T: TaskRepository> DeleteTaskUseCase<T> {
    pub async fn execute(&self, user_id: Uuid, task_id: Uuid) -> Result<(), CompostServiceError> {
        let task = find_task(&self.tasks, task_id).await?;
        if task.created_by != user_id {
            return Err(CompostServiceError::NotTaskCreator);
        }
        self.tasks.delete(task_id).await
    }
}
