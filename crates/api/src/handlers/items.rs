use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::dates::{merge_ranges, DateRange};
use unajmi_core::delivery;
use unajmi_core::error::CoreError;
use unajmi_db::models::item::{CreateItem, Item, ItemFilter, ItemSlot, SlotInput, UpdateItem};
use unajmi_db::repositories::booking_repo::BookingRepo;
use unajmi_db::repositories::item_repo::ItemRepo;

use crate::error::AppError;
use crate::handlers::plans::plan_status_for;
use crate::middleware::auth::{ensure_profile, is_admin, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub slots: Vec<ItemSlot>,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    /// Owner-declared windows, as entered.
    pub slots: Vec<ItemSlot>,
    /// Union of all non-cancelled bookings, merged and sorted.
    pub booked: Vec<DateRange>,
}

/// POST /items — create a listing, subject to the caller's plan quota.
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateItem>,
) -> Result<(StatusCode, Json<DataResponse<Item>>), AppError> {
    input.validate()?;
    delivery::validate_offered(&input.delivery_methods)?;
    validate_slots(&input.slots)?;

    let profile = ensure_profile(&state, &auth).await?;
    let status = plan_status_for(&state, &profile).await?;
    if !status.can_create_listing {
        return Err(CoreError::QuotaExceeded {
            max_listings: status.max_listings,
        }
        .into());
    }

    let item = ItemRepo::create(&state.pool, &auth.user_id, &input).await?;
    tracing::info!(item_id = %item.id, owner = %auth.user_id, "listing created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(item))))
}

/// GET /items — public search over live listings.
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<DataResponse<Vec<Item>>>, AppError> {
    let items = ItemRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /items/mine — the caller's own live listings.
pub async fn my_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<Item>>>, AppError> {
    let filter = ItemFilter {
        owner_id: Some(auth.user_id),
        ..ItemFilter::default()
    };
    let items = ItemRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<ItemDetail>>, AppError> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    let slots = ItemRepo::list_slots(&state.pool, item.id).await?;
    Ok(Json(DataResponse::new(ItemDetail { item, slots })))
}

/// GET /items/by-short-id/{short_id} — share-link resolution.
pub async fn get_item_by_short_id(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<DataResponse<ItemDetail>>, AppError> {
    let item = ItemRepo::find_by_short_id(&state.pool, &short_id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", &short_id))?;
    let slots = ItemRepo::list_slots(&state.pool, item.id).await?;
    Ok(Json(DataResponse::new(ItemDetail { item, slots })))
}

/// GET /items/{id}/booked-ranges — what a renter sees on the calendar.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<Availability>>, AppError> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    let slots = ItemRepo::list_slots(&state.pool, item.id).await?;
    let booked = merge_ranges(BookingRepo::booked_ranges(&state.pool, item.id).await?);
    Ok(Json(DataResponse::new(Availability { slots, booked })))
}

/// PUT /items/{id} — owner or admin; absent fields keep their values.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
    Json(input): Json<UpdateItem>,
) -> Result<Json<DataResponse<Item>>, AppError> {
    input.validate()?;
    if let Some(methods) = &input.delivery_methods {
        delivery::validate_offered(methods)?;
    }
    if let Some(slots) = &input.slots {
        validate_slots(slots)?;
    }

    let existing = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    authorize_owner(&state, &auth, &existing).await?;

    let item = ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    Ok(Json(DataResponse::new(item)))
}

/// DELETE /items/{id} — soft delete; the row stays for history, the
/// media blobs go.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    let existing = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;
    authorize_owner(&state, &auth, &existing).await?;

    let deleted = ItemRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", id))?;

    for media_id in &deleted.image_ids {
        if let Err(err) = state.media.delete(media_id).await {
            tracing::warn!(error = %err, media_id, item_id = %id, "media cleanup failed");
        }
    }

    tracing::info!(item_id = %id, "listing retired");
    Ok(StatusCode::NO_CONTENT)
}

async fn authorize_owner(state: &AppState, auth: &AuthUser, item: &Item) -> Result<(), AppError> {
    if item.owner_id == auth.user_id || is_admin(state, auth).await? {
        Ok(())
    } else {
        Err(CoreError::Forbidden("not the owner of this item".to_string()).into())
    }
}

fn validate_slots(slots: &[SlotInput]) -> Result<(), AppError> {
    for slot in slots {
        DateRange::new(slot.start_date, slot.end_date)?;
    }
    Ok(())
}
