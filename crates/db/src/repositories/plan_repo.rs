use crate::models::plan::Plan;
use crate::DbPool;
use unajmi_core::plans;
use unajmi_core::types::DbId;

pub(crate) const COLUMNS: &str = "id, slug, name, price_cents, currency, max_listings, \
     allowed_delivery_methods, has_badge, badge_label, is_public, listing_duration_days, \
     sort_order, created_at";

pub struct PlanRepo;

impl PlanRepo {
    pub async fn list_public(pool: &DbPool) -> Result<Vec<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>(&format!(
            "SELECT {COLUMNS} FROM plans WHERE is_public ORDER BY sort_order"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_slug(pool: &DbPool, slug: &str) -> Result<Option<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {COLUMNS} FROM plans WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Plan>, sqlx::Error> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {COLUMNS} FROM plans WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The free tier is seeded by migration and must always exist.
    pub async fn free_plan(pool: &DbPool) -> Result<Plan, sqlx::Error> {
        sqlx::query_as::<_, Plan>(&format!("SELECT {COLUMNS} FROM plans WHERE slug = $1"))
            .bind(plans::FREE)
            .fetch_one(pool)
            .await
    }
}
