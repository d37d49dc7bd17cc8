//! Execution-log repository functions.
//!
//! The partial unique index on (workflow_id, candidate_id) WHERE
//! status = 'pending' is the engine's duplicate-in-flight guard; the
//! insert below surfaces its violation as `DbError::Conflict`.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::WorkflowExecutionRow, DbError};

const COLUMNS: &str = "id, workflow_id, candidate_id, status, email_log_id, \
                       error_message, started_at, finished_at";

/// Insert a `pending` execution row, claiming the in-flight slot for the
/// (workflow, candidate) pair.
pub async fn create_pending(
    pool: &PgPool,
    workflow_id: Uuid,
    candidate_id: Uuid,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();

    let result = sqlx::query(
        "INSERT INTO workflow_executions (id, workflow_id, candidate_id, status, started_at) \
         VALUES ($1, $2, $3, 'pending', $4)",
    )
    .bind(id)
    .bind(workflow_id)
    .bind(candidate_id)
    .bind(Utc::now())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(id),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DbError::Conflict)
        }
        Err(err) => Err(err.into()),
    }
}

/// Transition an execution to a terminal status.
pub async fn finish(
    pool: &PgPool,
    execution_id: Uuid,
    status: &str,
    email_log_id: Option<Uuid>,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE workflow_executions \
         SET status = $1, email_log_id = $2, error_message = $3, finished_at = $4 \
         WHERE id = $5",
    )
    .bind(status)
    .bind(email_log_id)
    .bind(error_message)
    .bind(Utc::now())
    .bind(execution_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert an already-terminal `skipped` execution with its reason.
pub async fn record_skipped(
    pool: &PgPool,
    workflow_id: Uuid,
    candidate_id: Uuid,
    reason: &str,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO workflow_executions \
             (id, workflow_id, candidate_id, status, error_message, started_at, finished_at) \
         VALUES ($1, $2, $3, 'skipped', $4, $5, $5)",
    )
    .bind(id)
    .bind(workflow_id)
    .bind(candidate_id)
    .bind(reason)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Whether any of the given workflows already has a `sent` execution for
/// this candidate.
pub async fn has_sent(
    pool: &PgPool,
    workflow_ids: &[Uuid],
    candidate_id: Uuid,
) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
             SELECT 1 FROM workflow_executions \
             WHERE workflow_id = ANY($1) AND candidate_id = $2 AND status = 'sent')",
    )
    .bind(workflow_ids)
    .bind(candidate_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Execution history for a candidate, newest first.
pub async fn list_for_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<WorkflowExecutionRow>, DbError> {
    let rows = sqlx::query_as::<_, WorkflowExecutionRow>(&format!(
        "SELECT {COLUMNS} FROM workflow_executions \
         WHERE candidate_id = $1 ORDER BY started_at DESC"
    ))
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
