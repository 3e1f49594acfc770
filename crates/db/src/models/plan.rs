use serde::Serialize;
use sqlx::FromRow;
use unajmi_core::types::{DbId, Timestamp};

/// A row of the plan catalog, seeded by migration.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Plan {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    /// -1 means unlimited.
    pub max_listings: i32,
    pub allowed_delivery_methods: Vec<String>,
    pub has_badge: bool,
    pub badge_label: Option<String>,
    pub is_public: bool,
    pub listing_duration_days: Option<i32>,
    pub sort_order: i32,
    pub created_at: Timestamp,
}
