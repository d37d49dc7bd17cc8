//! Email template reads.  Templates are authored in settings; the engine
//! and API only read them here.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::EmailTemplateRow, DbError};

pub async fn get_template(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<EmailTemplateRow>, DbError> {
    let row = sqlx::query_as::<_, EmailTemplateRow>(
        "SELECT id, user_id, name, subject, body, created_at \
         FROM email_templates WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_templates(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmailTemplateRow>, DbError> {
    let rows = sqlx::query_as::<_, EmailTemplateRow>(
        "SELECT id, user_id, name, subject, body, created_at \
         FROM email_templates WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
