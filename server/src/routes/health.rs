//! Liveness and database connectivity probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::db;
use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusMessage {
    pub message: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DbStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DbStatus {
    pub(crate) fn from_ping(result: Result<(), sqlx::Error>) -> Self {
        match result {
            Ok(()) => Self { status: "Database connected successfully!", error: None },
            Err(e) => Self { status: "Failed to connect", error: Some(e.to_string()) },
        }
    }
}

/// `GET /api`: backend banner.
pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage { message: "Backend is running!" })
}

/// `GET /api/test-db`: report whether the pool can reach Postgres.
///
/// Always `200`; the body says which way it went.
pub async fn test_db(State(state): State<AppState>) -> Json<DbStatus> {
    let result = db::ping(&state.pool).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "database probe failed");
    }
    Json(DbStatus::from_ping(result))
}

/// `GET /healthz`
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "health_test.rs"]
mod tests;
