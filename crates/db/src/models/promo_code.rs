use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use unajmi_core::types::{DbId, Timestamp};

/// A single-use plan grant. Codes are stored normalized (trimmed,
/// uppercase) and burn atomically on first redemption.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromoCode {
    pub id: DbId,
    pub code: String,
    pub plan_id: DbId,
    /// `None` grants the plan without expiry.
    pub duration_months: Option<i32>,
    pub valid_until: Timestamp,
    pub used_by: Option<String>,
    pub used_at: Option<Timestamp>,
    pub created_by: String,
    pub created_at: Timestamp,
}

/// Admin request to mint a code. When `code` is absent one is generated.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePromoCode {
    pub code: Option<String>,
    pub plan_slug: String,
    #[validate(range(min = 1, max = 120))]
    pub duration_months: Option<i32>,
    pub valid_until: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct RedeemCode {
    pub code: String,
}

/// Admin request to put a user on a plan directly.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignPlan {
    pub plan_slug: String,
    #[validate(range(min = 1, max = 120))]
    pub duration_months: Option<i32>,
}
