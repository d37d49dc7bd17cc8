//! Profile reads — only the display name is consumed (the `{your_name}`
//! placeholder).

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

pub async fn profile_name(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, DbError> {
    let name = sqlx::query_scalar::<_, Option<String>>(
        "SELECT name FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(name.flatten())
}
