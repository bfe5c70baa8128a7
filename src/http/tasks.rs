//! Handlers for `/api/tasks`.
//!
//! Bodies arrive as raw bytes and are checked against an explicit schema
//! before a typed task value is built. Parsing happens inside the handler,
//! not in an extractor, so a malformed body is a 400 `VALIDATION_ERROR`
//! in the taxonomy's `{code, message}` shape and no `Content-Type` header
//! is required.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::db::task_repo;
use crate::error::TaskpadError;
use crate::http::AppState;
use crate::models::{NewTask, Task, TaskPatch, TaskStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    due_date: DateTime<Utc>,
    #[serde(default)]
    reminder_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    reminder_date: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<TaskStatus>,
}

pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), TaskpadError> {
    let req: CreateTaskRequest = parse_body(&body)?;
    let name = validate_name(req.name)?;

    let new = NewTask {
        name,
        description: req.description,
        category: req.category,
        due_date: req.due_date,
        reminder_date: req.reminder_date,
    };

    let conn = state.db.lock().await;
    let task = task_repo::create_task(&conn, &new)?;
    info!(id = %task.id, name = %task.name, "task created");
    Ok((StatusCode::CREATED, Json(task.into_view(Utc::now()))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Task>>, TaskpadError> {
    let conn = state.db.lock().await;
    let now = Utc::now();
    let tasks = task_repo::list_tasks(&conn)?
        .into_iter()
        .map(|t| t.into_view(now))
        .collect();
    Ok(Json(tasks))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, TaskpadError> {
    let conn = state.db.lock().await;
    let task = task_repo::get_task_by_id(&conn, &id)?;
    Ok(Json(task.into_view(Utc::now())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, TaskpadError> {
    let req: UpdateTaskRequest = parse_body(&body)?;
    let name = req.name.map(validate_name).transpose()?;

    let patch = TaskPatch {
        name,
        description: req.description,
        category: req.category,
        due_date: req.due_date,
        reminder_date: req.reminder_date,
        status: req.status,
    };

    let conn = state.db.lock().await;
    let task = task_repo::update_task(&conn, &id, &patch)?;
    Ok(Json(task.into_view(Utc::now())))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, TaskpadError> {
    let conn = state.db.lock().await;
    task_repo::delete_task(&conn, &id)?;
    info!(id = %id, "task deleted");
    Ok(Json(serde_json::json!({
        "message": "Task deleted successfully"
    })))
}

pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, TaskpadError> {
    transition(&state, &id, TaskStatus::InProgress).await
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, TaskpadError> {
    transition(&state, &id, TaskStatus::Completed).await
}

/// Transition rules run against the derived status, so a past-due task is
/// judged as `overdue` even though the stored column still says `pending`.
async fn transition(
    state: &AppState,
    id: &str,
    target: TaskStatus,
) -> Result<Json<Task>, TaskpadError> {
    let conn = state.db.lock().await;
    let now = Utc::now();
    let current = task_repo::get_task_by_id(&conn, id)?.derived_status(now);

    let allowed = match target {
        TaskStatus::InProgress => current.can_start(),
        TaskStatus::Completed => current.can_complete(),
        _ => false,
    };
    if !allowed {
        return Err(TaskpadError::invalid_transition(
            current.as_str(),
            target.as_str(),
        ));
    }

    let task = task_repo::set_status(&conn, id, target)?;
    info!(id = %id, status = %target.as_str(), "task transitioned");
    Ok(Json(task.into_view(now)))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, TaskpadError> {
    serde_json::from_slice(body).map_err(|e| TaskpadError::validation(e.to_string()))
}

fn validate_name(name: String) -> Result<String, TaskpadError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TaskpadError::validation("name must not be empty"));
    }
    Ok(trimmed.to_string())
}
