//! HTTP surface: the `/api/tasks` router, shared state, and the mapping
//! from [`TaskpadError`] codes to response status codes.

pub mod tasks;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use rusqlite::Connection;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ErrorCode, TaskpadError};

/// Shared state for axum handlers. A single connection guarded by a mutex:
/// concurrent requests serialize on the store and the later write wins.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_one).put(tasks::update).delete(tasks::remove),
        )
        .route("/api/tasks/{id}/in-progress", put(tasks::start))
        .route("/api/tasks/{id}/completed", put(tasks::complete))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

async fn root() -> &'static str {
    "Task Manager API is running"
}

impl IntoResponse for TaskpadError {
    fn into_response(self) -> Response {
        let status = match self.code {
            ErrorCode::ValidationError | ErrorCode::InvalidStatusTransition => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "code": self.code.as_str(),
            "message": self.message,
        }));
        (status, body).into_response()
    }
}
