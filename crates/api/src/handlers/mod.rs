//! Shared handler state and helpers.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use uuid::Uuid;

use db::PgStore;
use engine::WorkflowRunner;

pub mod workflows;
pub mod candidates;
pub mod executions;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PgStore>,
    pub runner: Arc<WorkflowRunner>,
}

/// The acting user's id, supplied by the upstream auth layer.
pub fn user_id(headers: &HeaderMap) -> Result<Uuid, StatusCode> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(StatusCode::UNAUTHORIZED)
}
