//! Subscription plan tiers.
//!
//! The plan catalog itself lives in the database (seeded by migration);
//! these are the well-known slugs plus the rules that do not belong in
//! a table: what "unlimited" means and how a paid plan's expiry is
//! computed from a duration in months.

use chrono::Days;

use crate::error::CoreError;
use crate::types::Timestamp;

pub const FREE: &str = "free";
pub const STARTER: &str = "starter";
pub const ULTIMATE: &str = "ultimate";
pub const LIFETIME: &str = "lifetime";
pub const SINGLE_LISTING: &str = "single-listing";

/// Sentinel for `plans.max_listings` meaning no cap.
pub const UNLIMITED_LISTINGS: i32 = -1;

/// True when `active` more listings would exceed `max_listings`.
pub fn listing_quota_reached(max_listings: i32, active: i64) -> bool {
    max_listings != UNLIMITED_LISTINGS && active >= i64::from(max_listings)
}

/// Expiry for a plan granted now with the given duration. Months are
/// billed as 30-day blocks; `None` (lifetime grants) never expires.
pub fn plan_expiry(now: Timestamp, duration_months: Option<i32>) -> Result<Option<Timestamp>, CoreError> {
    match duration_months {
        None => Ok(None),
        Some(months) if months <= 0 => Err(CoreError::Validation(format!(
            "plan duration must be positive, got {months} months"
        ))),
        Some(months) => {
            let days = Days::new(30 * months as u64);
            let expires = now
                .checked_add_days(days)
                .ok_or_else(|| CoreError::Validation("plan duration overflows".into()))?;
            Ok(Some(expires))
        }
    }
}

/// A paid plan past its expiry no longer grants anything; callers fall
/// back to the free tier's limits.
pub fn plan_is_active(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    match expires_at {
        None => true,
        Some(expiry) => now < expiry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn quota_respects_unlimited_sentinel() {
        assert!(!listing_quota_reached(UNLIMITED_LISTINGS, 10_000));
        assert!(!listing_quota_reached(3, 2));
        assert!(listing_quota_reached(3, 3));
        assert!(listing_quota_reached(3, 4));
        assert!(listing_quota_reached(0, 0));
    }

    #[test]
    fn one_month_is_thirty_days() {
        let now = at(2025, 1, 1);
        let expires = plan_expiry(now, Some(1)).unwrap().unwrap();
        assert_eq!(expires, at(2025, 1, 31));
    }

    #[test]
    fn twelve_months_is_360_days() {
        let now = at(2025, 1, 1);
        let expires = plan_expiry(now, Some(12)).unwrap().unwrap();
        assert_eq!((expires - now).num_days(), 360);
    }

    #[test]
    fn lifetime_has_no_expiry() {
        assert_eq!(plan_expiry(at(2025, 1, 1), None).unwrap(), None);
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        assert_matches!(plan_expiry(at(2025, 1, 1), Some(0)), Err(CoreError::Validation(_)));
        assert_matches!(plan_expiry(at(2025, 1, 1), Some(-3)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn active_until_the_exact_expiry_instant() {
        let expiry = at(2025, 6, 1);
        assert!(plan_is_active(Some(expiry), at(2025, 5, 31)));
        assert!(!plan_is_active(Some(expiry), expiry));
        assert!(!plan_is_active(Some(expiry), at(2025, 6, 2)));
        assert!(plan_is_active(None, at(2099, 1, 1)));
    }
}
