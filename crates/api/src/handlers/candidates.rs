use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::error;
use uuid::Uuid;

use db::repository::candidates as candidate_repo;
use engine::models::Stage;

use super::{user_id, AppState};

#[derive(serde::Deserialize)]
pub struct ChangeStageDto {
    pub stage: Stage,
}

/// Move a candidate to a new pipeline stage and fire the matching
/// workflows in the background.
///
/// The stage change is the user's primary action; email automation runs
/// fire-and-forget and its failure is logged, never surfaced here.
pub async fn change_stage(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangeStageDto>,
) -> Result<StatusCode, StatusCode> {
    let user = user_id(&headers)?;

    match candidate_repo::set_stage(state.store.pool(), user, id, &payload.stage.to_string()).await
    {
        Ok(()) => {}
        Err(db::DbError::NotFound) => return Err(StatusCode::NOT_FOUND),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    let runner = state.runner.clone();
    let stage = payload.stage;
    tokio::spawn(async move {
        if let Err(err) = runner.execute_workflows_for_stage(id, stage, user, true).await {
            error!(candidate_id = %id, "stage automation failed: {err}");
        }
    });

    Ok(StatusCode::ACCEPTED)
}
