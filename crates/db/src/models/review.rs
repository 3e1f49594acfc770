use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::types::{DbId, Timestamp};

pub const ROLE_RENTER: &str = "renter";
pub const ROLE_OWNER: &str = "owner";

/// A post-rental review. Renters review the item and its owner; owners
/// review the renter. One review per booking per role, enforced by a
/// unique constraint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: DbId,
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub reviewer_id: String,
    pub reviewee_id: String,
    pub reviewer_role: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
