use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    TaskNotFound,
    InvalidStatusTransition,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskpadError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskpadError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn task_not_found(id: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {id}"))
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStatusTransition,
            format!("Invalid status transition: {from} → {to}"),
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for TaskpadError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
