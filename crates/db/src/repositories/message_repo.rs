use uuid::Uuid;

use crate::models::message::Message;
use crate::DbPool;
use unajmi_core::types::Timestamp;

pub(crate) const COLUMNS: &str = "id, booking_id, sender_id, body, is_system, created_at";

/// Hard cap on messages returned per thread fetch.
const THREAD_LIMIT: i64 = 500;

pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(
        pool: &DbPool,
        booking_id: Uuid,
        sender_id: &str,
        body: &str,
        is_system: bool,
    ) -> Result<Message, sqlx::Error> {
        sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages (booking_id, sender_id, body, is_system) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(booking_id)
        .bind(sender_id)
        .bind(body)
        .bind(is_system)
        .fetch_one(pool)
        .await
    }

    /// Latest messages of a thread in chronological order.
    pub async fn list_for_booking(
        pool: &DbPool,
        booking_id: Uuid,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let mut messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {COLUMNS} FROM messages WHERE booking_id = $1 \
             ORDER BY id DESC LIMIT $2"
        ))
        .bind(booking_id)
        .bind(THREAD_LIMIT)
        .fetch_all(pool)
        .await?;
        messages.reverse();
        Ok(messages)
    }

    /// Deletes chat history of bookings returned before `cutoff`.
    /// Returns the number of messages removed.
    pub async fn purge_for_returned_before(
        pool: &DbPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM messages USING bookings \
             WHERE messages.booking_id = bookings.id \
               AND bookings.status = 'vracen' \
               AND bookings.returned_at < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
