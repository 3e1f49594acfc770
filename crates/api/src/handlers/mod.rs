pub mod admin;
pub mod bookings;
pub mod items;
pub mod media;
pub mod messages;
pub mod notifications;
pub mod plans;
pub mod profile;
pub mod promo;
pub mod reviews;
