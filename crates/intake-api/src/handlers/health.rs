//! Health check handler.
//!
//! Reports whether the contacts table is reachable. The check never fails
//! the request: an uninitialised database still answers `200` so that
//! monitors keep seeing the worker as up before the first submission.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::AppState;

/// Health check response body.
///
/// Field order is part of the wire format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: &'static str,
    /// Worker identifier.
    pub worker: String,
    /// Storage state.
    pub database: DatabaseStatus,
    /// Number of stored contacts, when the table exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_contacts: Option<i64>,
    /// ISO-8601 time of the check, when the table exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Operator hint, when the table does not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Storage state reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatabaseStatus {
    /// The contacts table answered a count query.
    #[serde(rename = "connected")]
    Connected,
    /// The count query failed, usually because no contact was saved yet.
    #[serde(rename = "not initialized")]
    NotInitialized,
}

impl HealthResponse {
    /// Response for a reachable contacts table.
    pub fn connected(worker: impl Into<String>, total_contacts: i64, now: DateTime<Utc>) -> Self {
        Self {
            status: "healthy",
            worker: worker.into(),
            database: DatabaseStatus::Connected,
            total_contacts: Some(total_contacts),
            timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            message: None,
        }
    }

    /// Response for a missing or unreachable contacts table.
    pub fn not_initialized(worker: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            worker: worker.into(),
            database: DatabaseStatus::NotInitialized,
            total_contacts: None,
            timestamp: None,
            message: Some("Run database migrations first"),
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Counts stored contacts and reports worker health.
pub async fn health_check(state: &AppState) -> HealthResponse {
    let started = state.clock.now();
    let worker = state.settings.worker_name.as_str();

    match state.storage.count().await {
        Ok(count) => {
            debug!(
                total_contacts = count,
                elapsed_ms = u64::try_from(state.clock.now().duration_since(started).as_millis())
                    .unwrap_or(u64::MAX),
                "Health check completed"
            );
            HealthResponse::connected(worker, count, state.clock.utc_now())
        },
        Err(e) => {
            debug!(error = %e, "Contacts table unavailable");
            HealthResponse::not_initialized(worker)
        },
    }
}
