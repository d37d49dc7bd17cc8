//! Job reads — the engine only needs title/company for rendering.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::JobRow, DbError};

pub async fn get_job(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<JobRow>, DbError> {
    let row = sqlx::query_as::<_, JobRow>(
        "SELECT id, user_id, title, company, created_at \
         FROM jobs WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
