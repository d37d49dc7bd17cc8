//! Offer reads — only the most recent open offer participates in
//! rendering.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::OfferRow, DbError};

/// The newest offer for the candidate still in an open status.
pub async fn latest_open_offer(
    pool: &PgPool,
    user_id: Uuid,
    candidate_id: Uuid,
) -> Result<Option<OfferRow>, DbError> {
    let row = sqlx::query_as::<_, OfferRow>(
        "SELECT id, user_id, candidate_id, status, position_title, salary_amount, \
                salary_currency, salary_period, start_date, expires_at, benefits, \
                notes, created_at \
         FROM offers \
         WHERE user_id = $1 AND candidate_id = $2 \
           AND status IN ('draft', 'sent', 'viewed', 'negotiating') \
         ORDER BY created_at DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .bind(candidate_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
