use serde::Serialize;
use sqlx::FromRow;

use unajmi_core::types::{DbId, Timestamp};

/// An in-app notification. `kind` is one of the constants in
/// `unajmi_core::notify`; `link` is a client-side route.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: DbId,
    pub user_id: String,
    pub kind: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}
