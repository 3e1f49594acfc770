use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::booking::BookingStatus;
use unajmi_core::error::CoreError;
use unajmi_db::models::review::{CreateReview, Review, ROLE_OWNER, ROLE_RENTER};
use unajmi_db::repositories::item_repo::ItemRepo;
use unajmi_db::repositories::review_repo::ReviewRepo;

use crate::error::AppError;
use crate::handlers::bookings::find_for_party;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /bookings/{id}/reviews — each side gets one review, and only
/// once the item has come back.
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
    Json(input): Json<CreateReview>,
) -> Result<(StatusCode, Json<DataResponse<Review>>), AppError> {
    input.validate()?;

    let booking = find_for_party(&state, id, &auth).await?;
    let (role, reviewee) = if auth.user_id == booking.renter_id {
        (ROLE_RENTER, booking.owner_id.clone())
    } else if auth.user_id == booking.owner_id {
        (ROLE_OWNER, booking.renter_id.clone())
    } else {
        return Err(CoreError::Forbidden(
            "only booking parties can leave a review".to_string(),
        )
        .into());
    };

    if booking.lifecycle_status()? != BookingStatus::Returned {
        return Err(CoreError::NotEligible(
            "reviews open once the item has been returned".to_string(),
        )
        .into());
    }

    let review = ReviewRepo::create(&state.pool, &booking, &auth.user_id, &reviewee, role, &input)
        .await?
        .ok_or(CoreError::AlreadyReviewed)?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

/// GET /bookings/{id}/reviews
pub async fn list_booking_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<Review>>>, AppError> {
    let booking = find_for_party(&state, id, &auth).await?;
    let reviews = ReviewRepo::list_for_booking(&state.pool, booking.id).await?;
    Ok(Json(DataResponse::new(reviews)))
}

/// GET /items/{id}/reviews — public; works for soft-deleted items too
/// so past renters keep their history.
pub async fn list_item_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<Vec<Review>>>, AppError> {
    let item = ItemRepo::find_any_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    let reviews = ReviewRepo::list_for_item(&state.pool, item.id).await?;
    Ok(Json(DataResponse::new(reviews)))
}

/// GET /users/{id}/reviews — public reputation feed.
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Vec<Review>>>, AppError> {
    let reviews = ReviewRepo::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(DataResponse::new(reviews)))
}
