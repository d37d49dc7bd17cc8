use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use uuid::Uuid;

use db::repository::{templates as template_repo, workflows as wf_repo};
use engine::models::{Stage, Workflow};
use engine::RunOutcome;

use super::{user_id, AppState};

#[derive(serde::Deserialize)]
pub struct CreateWorkflowDto {
    pub name: String,
    pub trigger_stage: Stage,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub email_template_id: Uuid,
    pub min_match_score: Option<i32>,
    #[serde(default)]
    pub source_filter: Vec<String>,
    #[serde(default)]
    pub delay_minutes: u32,
}

fn default_enabled() -> bool {
    true
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Workflow>>, StatusCode> {
    let user = user_id(&headers)?;
    let rows = wf_repo::list_workflows(state.store.pool(), user)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let workflows = rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Workflow>, _>>()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(workflows))
}

pub async fn get_one(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Workflow>, StatusCode> {
    let user = user_id(&headers)?;
    let row = wf_repo::get_workflow(state.store.pool(), user, id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    row.try_into()
        .map(Json)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateWorkflowDto>,
) -> Result<(StatusCode, Json<Workflow>), StatusCode> {
    let user = user_id(&headers)?;

    // The template reference must resolve before the workflow is accepted.
    let template = template_repo::get_template(state.store.pool(), user, payload.email_template_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if template.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let row = wf_repo::create_workflow(
        state.store.pool(),
        user,
        &payload.name,
        &payload.trigger_stage.to_string(),
        payload.enabled,
        payload.email_template_id,
        payload.min_match_score,
        &payload.source_filter,
        payload.delay_minutes as i32,
    )
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    row.try_into()
        .map(|wf| (StatusCode::CREATED, Json(wf)))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    let user = user_id(&headers)?;
    match wf_repo::delete_workflow(state.store.pool(), user, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(db::DbError::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[derive(serde::Deserialize)]
pub struct TestSendDto {
    pub candidate_id: Uuid,
}

#[derive(serde::Serialize)]
pub struct TestSendResponse {
    pub outcome: String,
    pub execution_id: Option<Uuid>,
}

/// Settings "send test email" action: runs the workflow with the enabled
/// check bypassed and surfaces any engine error directly to the caller.
pub async fn test_send(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TestSendDto>,
) -> Result<Json<TestSendResponse>, (StatusCode, String)> {
    let user = user_id(&headers).map_err(|code| (code, "missing x-user-id".to_string()))?;

    let outcome = state
        .runner
        .execute_workflow(id, payload.candidate_id, user, true)
        .await
        .map_err(|err| (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;

    let response = match outcome {
        RunOutcome::Sent { execution_id, .. } => TestSendResponse {
            outcome: "sent".into(),
            execution_id: Some(execution_id),
        },
        RunOutcome::Skipped { execution_id, reason } => TestSendResponse {
            outcome: reason.to_string(),
            execution_id: Some(execution_id),
        },
        RunOutcome::AlreadyRunning => TestSendResponse {
            outcome: "already running".into(),
            execution_id: None,
        },
    };

    Ok(Json(response))
}
