//! Shared type aliases used across the workspace.

/// Row id for tables keyed by `BIGSERIAL` (notifications, messages,
/// reviews, promo codes, plans).
pub type DbId = i64;

/// All timestamps are UTC; dates (booking ranges, availability slots)
/// are calendar days without a time zone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Subject identifier minted by the external identity provider.
/// Opaque to us; never parsed, only compared.
pub type UserId = String;
