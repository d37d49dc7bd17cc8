//! Workflow CRUD operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::WorkflowRow, DbError};

const COLUMNS: &str = "id, user_id, name, trigger_stage, enabled, email_template_id, \
                       min_match_score, source_filter, delay_minutes, created_at";

/// Insert a new workflow and return the stored row.
#[allow(clippy::too_many_arguments)]
pub async fn create_workflow(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    trigger_stage: &str,
    enabled: bool,
    email_template_id: Uuid,
    min_match_score: Option<i32>,
    source_filter: &[String],
    delay_minutes: i32,
) -> Result<WorkflowRow, DbError> {
    let row = sqlx::query_as::<_, WorkflowRow>(&format!(
        "INSERT INTO workflows \
             (id, user_id, name, trigger_stage, enabled, email_template_id, \
              min_match_score, source_filter, delay_minutes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(trigger_stage)
    .bind(enabled)
    .bind(email_template_id)
    .bind(min_match_score)
    .bind(source_filter)
    .bind(delay_minutes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a single workflow scoped to its owner.
pub async fn get_workflow(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<WorkflowRow>, DbError> {
    let row = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Return all of a user's workflows ordered by creation time (newest first).
pub async fn list_workflows(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkflowRow>, DbError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All enabled workflows for a trigger stage, in creation order.
pub async fn list_enabled_for_stage(
    pool: &PgPool,
    user_id: Uuid,
    trigger_stage: &str,
) -> Result<Vec<WorkflowRow>, DbError> {
    let rows = sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows \
         WHERE user_id = $1 AND trigger_stage = $2 AND enabled \
         ORDER BY created_at"
    ))
    .bind(user_id)
    .bind(trigger_stage)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Permanently delete a workflow by its primary key.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_workflow(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM workflows WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
