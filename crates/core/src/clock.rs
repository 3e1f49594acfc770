//! Injectable time source.
//!
//! Anything that compares "now" against stored timestamps (plan expiry,
//! promo validity, reminder and retention sweeps) takes a [`Clock`]
//! instead of calling `Utc::now()` directly, so tests can pin time.

use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time. The only implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// Returns the same instant on every call. Test-only by convention,
/// but lives here so integration tests in other crates can use it.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
