use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// Completion is terminal; no transition leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// `overdue` is a derived view over the non-terminal statuses, never a
    /// stored value. Writes that ask for it land on the underlying base.
    pub fn storage_base(&self) -> Self {
        match self {
            Self::Overdue => Self::Pending,
            other => *other,
        }
    }

    /// Whether `pending → in-progress` may fire from this (derived) status.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }

    /// Whether `→ completed` may fire from this (derived) status.
    pub fn can_complete(&self) -> bool {
        !self.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Status as of `now`: a non-completed task past its due date reads as
    /// overdue. Evaluated lazily on every read and write path; the stored
    /// column is never rewritten to `overdue`.
    pub fn derived_status(&self, now: DateTime<Utc>) -> TaskStatus {
        if self.status != TaskStatus::Completed && self.due_date < now {
            TaskStatus::Overdue
        } else {
            self.status
        }
    }

    /// The task as the API reports it, with the overdue derivation applied.
    pub fn into_view(mut self, now: DateTime<Utc>) -> Task {
        self.status = self.derived_status(now);
        self
    }
}

/// Fields for a create. The store assigns id, status, and timestamps.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: DateTime<Utc>,
    pub reminder_date: Option<DateTime<Utc>>,
}

/// Partial update. `None` keeps the stored value; `id` and `created_at`
/// are immutable and have no patch field.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}
