use uuid::Uuid;

use crate::models::item::{CreateItem, Item, ItemFilter, ItemSlot, SlotInput, UpdateItem};
use crate::DbPool;
use unajmi_core::slug;

pub(crate) const COLUMNS: &str = "id, owner_id, title, description, category, \
     price_per_day_cents, deposit_cents, delivery_methods, image_ids, \
     short_id, slug, deleted_at, created_at, updated_at";

const SLOT_COLUMNS: &str = "id, item_id, start_date, end_date";

/// Attempts before giving up on a short-id collision. Each retry draws
/// a fresh UUID, so consecutive collisions are vanishingly unlikely.
const SHORT_ID_ATTEMPTS: u32 = 3;

pub struct ItemRepo;

impl ItemRepo {
    /// Inserts the item and its availability slots in one transaction.
    /// The 8-char short id is unique-indexed; on a collision the whole
    /// insert retries with a new UUID.
    pub async fn create(
        pool: &DbPool,
        owner_id: &str,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let slug_value = slug::slugify(&input.title);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let id = Uuid::new_v4();
            let short = slug::short_id(&id);

            let mut tx = pool.begin().await?;
            let inserted = sqlx::query_as::<_, Item>(&format!(
                "INSERT INTO items (id, owner_id, title, description, category, \
                     price_per_day_cents, deposit_cents, delivery_methods, image_ids, \
                     short_id, slug) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
                 RETURNING {COLUMNS}"
            ))
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_per_day_cents)
            .bind(input.deposit_cents)
            .bind(&input.delivery_methods)
            .bind(&input.image_ids)
            .bind(&short)
            .bind(&slug_value)
            .fetch_one(&mut *tx)
            .await;

            let item = match inserted {
                Ok(item) => item,
                Err(sqlx::Error::Database(ref db_err))
                    if db_err.constraint() == Some("items_short_id_key")
                        && attempt < SHORT_ID_ATTEMPTS =>
                {
                    tracing::warn!(short_id = %short, attempt, "short id collision, retrying");
                    continue;
                }
                Err(err) => return Err(err),
            };

            Self::insert_slots(&mut tx, item.id, &input.slots).await?;
            tx.commit().await?;
            return Ok(item);
        }
    }

    async fn insert_slots(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item_id: Uuid,
        slots: &[SlotInput],
    ) -> Result<(), sqlx::Error> {
        for slot in slots {
            sqlx::query("INSERT INTO item_slots (item_id, start_date, end_date) VALUES ($1, $2, $3)")
                .bind(item_id)
                .bind(slot.start_date)
                .bind(slot.end_date)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Live items only; retired listings read as absent.
    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {COLUMNS} FROM items WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Looks an item up regardless of deletion, for booking history views.
    pub async fn find_any_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(&format!("SELECT {COLUMNS} FROM items WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_short_id(
        pool: &DbPool,
        short_id: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT {COLUMNS} FROM items WHERE short_id = $1 AND deleted_at IS NULL"
        ))
        .bind(short_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &DbPool, filter: &ItemFilter) -> Result<Vec<Item>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(50).clamp(1, 100);
        let offset = filter.offset.unwrap_or(0).max(0);
        let pattern = filter.q.as_deref().map(like_pattern);

        sqlx::query_as::<_, Item>(&format!(
            "SELECT {COLUMNS} FROM items \
             WHERE deleted_at IS NULL \
               AND ($1::text IS NULL OR title ILIKE $1) \
               AND ($2::text IS NULL OR category = $2) \
               AND ($3::text IS NULL OR owner_id = $3) \
             ORDER BY created_at DESC \
             LIMIT $4 OFFSET $5"
        ))
        .bind(pattern)
        .bind(filter.category.as_deref())
        .bind(filter.owner_id.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Partial update. Passing `slots` replaces the availability set.
    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let updated = sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 category = COALESCE($4, category), \
                 price_per_day_cents = COALESCE($5, price_per_day_cents), \
                 deposit_cents = COALESCE($6, deposit_cents), \
                 delivery_methods = COALESCE($7, delivery_methods), \
                 image_ids = COALESCE($8, image_ids), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(input.title.as_deref())
        .bind(input.description.as_deref())
        .bind(input.category.as_deref())
        .bind(input.price_per_day_cents)
        .bind(input.deposit_cents)
        .bind(input.delivery_methods.as_deref())
        .bind(input.image_ids.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(item) = updated else {
            return Ok(None);
        };

        if let Some(slots) = &input.slots {
            sqlx::query("DELETE FROM item_slots WHERE item_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_slots(&mut tx, id, slots).await?;
        }

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Retires a listing. The row survives for booking history; the
    /// returned item carries the image ids so the caller can clean up
    /// the media store.
    pub async fn soft_delete(pool: &DbPool, id: Uuid) -> Result<Option<Item>, sqlx::Error> {
        sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Listings that count against the owner's plan quota.
    pub async fn count_active_for_owner(
        pool: &DbPool,
        owner_id: &str,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM items WHERE owner_id = $1 AND deleted_at IS NULL")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn list_slots(pool: &DbPool, item_id: Uuid) -> Result<Vec<ItemSlot>, sqlx::Error> {
        sqlx::query_as::<_, ItemSlot>(&format!(
            "SELECT {SLOT_COLUMNS} FROM item_slots WHERE item_id = $1 ORDER BY start_date"
        ))
        .bind(item_id)
        .fetch_all(pool)
        .await
    }
}

/// Escapes LIKE wildcards in user input and wraps it for substring match.
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
