pub mod booking;
pub mod item;
pub mod message;
pub mod notification;
pub mod plan;
pub mod profile;
pub mod promo_code;
pub mod review;
