use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::review::{CreateReview, Review};
use crate::DbPool;

pub(crate) const COLUMNS: &str = "id, booking_id, item_id, reviewer_id, reviewee_id, \
     reviewer_role, rating, comment, created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Inserts a review for one side of a booking. Returns `None` when
    /// that side already reviewed; the unique constraint decides, so
    /// two racing submissions cannot both land.
    pub async fn create(
        pool: &DbPool,
        booking: &Booking,
        reviewer_id: &str,
        reviewee_id: &str,
        reviewer_role: &str,
        input: &CreateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (booking_id, item_id, reviewer_id, reviewee_id, \
                 reviewer_role, rating, comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT reviews_once_per_role DO NOTHING \
             RETURNING {COLUMNS}"
        ))
        .bind(booking.id)
        .bind(booking.item_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(reviewer_role)
        .bind(input.rating)
        .bind(input.comment.as_deref())
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_item(pool: &DbPool, item_id: Uuid) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE item_id = $1 ORDER BY created_at DESC"
        ))
        .bind(item_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_user(
        pool: &DbPool,
        reviewee_id: &str,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE reviewee_id = $1 ORDER BY created_at DESC"
        ))
        .bind(reviewee_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_booking(
        pool: &DbPool,
        booking_id: Uuid,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE booking_id = $1 ORDER BY created_at"
        ))
        .bind(booking_id)
        .fetch_all(pool)
        .await
    }
}
