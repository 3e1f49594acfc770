use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unajmi_core::types::{DbId, Timestamp};

use super::plan::Plan;

pub const DASHBOARD_MODES: [&str; 2] = ["renter", "owner"];

/// Marketplace profile for an identity-provider subject. Provisioned
/// lazily on the first authenticated request.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub plan_id: DbId,
    pub plan_activated_at: Timestamp,
    pub plan_expires_at: Option<Timestamp>,
    pub has_badge: bool,
    pub badge_label: Option<String>,
    pub default_dashboard_mode: String,
    /// Internal flag, never exposed over the API.
    #[serde(skip_serializing)]
    pub is_superadmin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub default_dashboard_mode: Option<String>,
}

/// Effective plan standing for a user, with quota headroom. The plan
/// shown here falls back to the free tier once a paid plan expires.
#[derive(Debug, Clone, Serialize)]
pub struct PlanStatus {
    pub plan: Plan,
    pub plan_expires_at: Option<Timestamp>,
    pub expired: bool,
    pub active_listings: i64,
    pub max_listings: i32,
    pub can_create_listing: bool,
    pub allowed_delivery_methods: Vec<String>,
    pub has_badge: bool,
}
