use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::types::{DbId, Timestamp};

/// One message in a booking's chat thread. System notices carry
/// `is_system = true` and are attributed to the user whose action
/// produced them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Message {
    pub id: DbId,
    pub booking_id: Uuid,
    pub sender_id: String,
    pub body: String,
    pub is_system: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessage {
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

/// An active block on a booking's chat thread. At most one per booking;
/// only the blocker or an admin can lift it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatBlock {
    pub booking_id: Uuid,
    pub blocked_by: String,
    pub created_at: Timestamp,
}
