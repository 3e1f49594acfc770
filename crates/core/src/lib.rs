//! Domain logic for the unajmi rental marketplace.
//!
//! This crate is intentionally free of I/O: the booking state machine,
//! date-range arithmetic, plan and delivery constants, promo-code rules
//! and slug derivation all live here as pure functions so they can be
//! unit tested without a database.

pub mod booking;
pub mod clock;
pub mod dates;
pub mod delivery;
pub mod error;
pub mod notify;
pub mod plans;
pub mod promo;
pub mod slug;
pub mod types;

pub use error::CoreError;
