use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::types::{DbId, Timestamp};

/// A rental listing. `short_id` and `slug` are derived at creation and
/// never change; `deleted_at` marks retirement (rows are kept so old
/// bookings and reviews stay resolvable).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price_per_day_cents: i64,
    pub deposit_cents: i64,
    pub delivery_methods: Vec<String>,
    pub image_ids: Vec<String>,
    pub short_id: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Owner-declared availability window, inclusive on both ends.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ItemSlot {
    pub id: DbId,
    pub item_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 3, max = 120))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(range(min = 0))]
    pub price_per_day_cents: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub deposit_cents: i64,
    pub delivery_methods: Vec<String>,
    #[validate(length(max = 10))]
    #[serde(default)]
    pub image_ids: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub slots: Vec<SlotInput>,
}

/// Partial update; absent fields keep their current values. Supplying
/// `slots` replaces the whole availability set.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub price_per_day_cents: Option<i64>,
    #[validate(range(min = 0))]
    pub deposit_cents: Option<i64>,
    pub delivery_methods: Option<Vec<String>>,
    #[validate(length(max = 10))]
    pub image_ids: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub slots: Option<Vec<SlotInput>>,
}

/// Search filter for the public catalog.
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    pub owner_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
