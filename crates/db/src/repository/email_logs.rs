//! Sent-email log writes and the Offer deduplication read.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Insert a sent-email record and return its id.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    candidate_id: Uuid,
    recipient: &str,
    subject: &str,
    body: &str,
    email_type: &str,
) -> Result<Uuid, DbError> {
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO email_logs \
             (id, user_id, candidate_id, recipient, subject, body, email_type, status, sent_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, 'sent', $8)",
    )
    .bind(id)
    .bind(user_id)
    .bind(candidate_id)
    .bind(recipient)
    .bind(subject)
    .bind(body)
    .bind(email_type)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Whether an offer-kind email was logged for the candidate at or after
/// `since`.
pub async fn offer_logged_since(
    pool: &PgPool,
    user_id: Uuid,
    candidate_id: Uuid,
    since: DateTime<Utc>,
) -> Result<bool, DbError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
             SELECT 1 FROM email_logs \
             WHERE user_id = $1 AND candidate_id = $2 \
               AND email_type = 'offer' AND sent_at >= $3)",
    )
    .bind(user_id)
    .bind(candidate_id)
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
