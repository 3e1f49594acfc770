pub mod booking_repo;
pub mod chat_block_repo;
pub mod item_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod plan_repo;
pub mod profile_repo;
pub mod promo_code_repo;
pub mod review_repo;
