use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use compost_core::error::error_response;
use compost_domain::UnknownValue;
use compost_domain::task::TaskStatus;

/// Compost service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CompostServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("profile not found")]
    ProfileNotFound,
    #[error("bin not found")]
    BinNotFound,
    #[error("task not found")]
    TaskNotFound,
    #[error("post not found")]
    PostNotFound,
    #[error("not a member of this bin")]
    NotBinMember,
    #[error("only the bin owner can do this")]
    NotBinOwner,
    #[error("only the volunteer who accepted this task can complete it")]
    NotTaskAcceptor,
    #[error("only the task creator can delete it")]
    NotTaskCreator,
    #[error("only the author can delete this post")]
    NotPostAuthor,
    #[error("task is {}", .0.as_str())]
    TaskStateConflict(TaskStatus),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownValue> for CompostServiceError {
    fn from(e: UnknownValue) -> Self {
        Self::Validation(e.to_string())
    }
}

impl CompostServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::BinNotFound => "BIN_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::PostNotFound => "POST_NOT_FOUND",
            Self::NotBinMember => "NOT_BIN_MEMBER",
            Self::NotBinOwner => "NOT_BIN_OWNER",
            Self::NotTaskAcceptor => "NOT_TASK_ACCEPTOR",
            Self::NotTaskCreator => "NOT_TASK_CREATOR",
            Self::NotPostAuthor => "NOT_POST_AUTHOR",
            Self::TaskStateConflict(_) => "TASK_STATE_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ProfileNotFound
            | Self::BinNotFound
            | Self::TaskNotFound
            | Self::PostNotFound => StatusCode::NOT_FOUND,
            Self::NotBinMember
            | Self::NotBinOwner
            | Self::NotTaskAcceptor
            | Self::NotTaskCreator
            | Self::NotPostAuthor => StatusCode::FORBIDDEN,
            Self::TaskStateConflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CompostServiceError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
