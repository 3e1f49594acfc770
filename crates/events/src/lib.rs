//! Outbound side effects: in-app notification fan-out and best-effort
//! email copies. Nothing in this crate can fail a request; errors are
//! logged and dropped.

pub mod delivery;
pub mod notifier;

pub use notifier::Notifier;
