//! Candidate reads and the two narrow writes the engine/API perform
//! (stage moves and upload-token backfill).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::CandidateRow, DbError};

const COLUMNS: &str = "id, user_id, name, email, stage, role, job_id, ai_match_score, \
                       source, is_test, cv_upload_token, cv_token_expires_at, \
                       cv_file_url, created_at";

pub async fn get_candidate(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<CandidateRow>, DbError> {
    let row = sqlx::query_as::<_, CandidateRow>(&format!(
        "SELECT {COLUMNS} FROM candidates WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a candidate to a new pipeline stage.
///
/// Returns `DbError::NotFound` if no row was updated.
pub async fn set_stage(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    stage: &str,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE candidates SET stage = $1 WHERE id = $2 AND user_id = $3")
        .bind(stage)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Persist a freshly generated CV-upload token and its expiry.
pub async fn save_upload_token(
    pool: &PgPool,
    candidate_id: Uuid,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE candidates SET cv_upload_token = $1, cv_token_expires_at = $2 WHERE id = $3",
    )
    .bind(token)
    .bind(expires_at)
    .bind(candidate_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
