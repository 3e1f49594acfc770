use uuid::Uuid;

use crate::models::message::ChatBlock;
use crate::DbPool;

pub(crate) const COLUMNS: &str = "booking_id, blocked_by, created_at";

pub struct ChatBlockRepo;

impl ChatBlockRepo {
    pub async fn find(pool: &DbPool, booking_id: Uuid) -> Result<Option<ChatBlock>, sqlx::Error> {
        sqlx::query_as::<_, ChatBlock>(&format!(
            "SELECT {COLUMNS} FROM chat_blocks WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(pool)
        .await
    }

    /// Blocks a thread and appends the system notice in one transaction.
    /// Returns `None` when the thread is already blocked (first block
    /// wins; the notice is not duplicated).
    pub async fn create(
        pool: &DbPool,
        booking_id: Uuid,
        blocked_by: &str,
        notice: &str,
    ) -> Result<Option<ChatBlock>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let block: Option<ChatBlock> = sqlx::query_as::<_, ChatBlock>(&format!(
            "INSERT INTO chat_blocks (booking_id, blocked_by) VALUES ($1, $2) \
             ON CONFLICT (booking_id) DO NOTHING \
             RETURNING {COLUMNS}"
        ))
        .bind(booking_id)
        .bind(blocked_by)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(block) = block else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO messages (booking_id, sender_id, body, is_system) \
             VALUES ($1, $2, $3, TRUE)",
        )
        .bind(booking_id)
        .bind(blocked_by)
        .bind(notice)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(block))
    }

    pub async fn remove(pool: &DbPool, booking_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_blocks WHERE booking_id = $1")
            .bind(booking_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
