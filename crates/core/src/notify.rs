//! Notification kinds.
//!
//! Stored as-is in `notifications.kind` and switched on by clients to
//! pick icons and deep links. Booking kinds carry the booking id in the
//! notification link; plan kinds link to the profile page.

pub const BOOKING_REQUESTED: &str = "booking_requested";
pub const BOOKING_APPROVED: &str = "booking_approved";
pub const BOOKING_REJECTED: &str = "booking_rejected";
pub const BOOKING_AGREED: &str = "booking_agreed";
pub const BOOKING_DELIVERED: &str = "booking_delivered";
pub const BOOKING_RETURNED: &str = "booking_returned";
pub const BOOKING_CANCELLED: &str = "booking_cancelled";
pub const RETURN_REMINDER: &str = "return_reminder";
pub const PLAN_CHANGED: &str = "plan_changed";
pub const LISTINGS_OVER_QUOTA: &str = "listings_over_quota";
pub const CHAT_BLOCKED: &str = "chat_blocked";
