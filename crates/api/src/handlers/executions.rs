use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use db::repository::candidates as candidate_repo;
use engine::models::WorkflowExecution;
use engine::EngineStore;

use super::{user_id, AppState};

/// Execution history for one candidate, newest first.
pub async fn list_for_candidate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<WorkflowExecution>>, StatusCode> {
    let user = user_id(&headers)?;

    // Ownership check before exposing the history.
    let candidate = candidate_repo::get_candidate(state.store.pool(), user, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if candidate.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }

    let executions = state
        .store
        .executions_for_candidate(id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(executions))
}
