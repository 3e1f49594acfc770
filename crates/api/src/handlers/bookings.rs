use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use unajmi_core::booking::{self, BookingAction, Party};
use unajmi_core::dates::DateRange;
use unajmi_core::delivery;
use unajmi_core::error::CoreError;
use unajmi_core::notify;
use unajmi_db::models::booking::{Booking, CreateBooking, NewBooking};
use unajmi_db::repositories::booking_repo::{
    AppliedTransition, BookingRepo, CreateOutcome, TransitionResult,
};
use unajmi_db::repositories::item_repo::ItemRepo;

use crate::error::AppError;
use crate::middleware::auth::{ensure_profile, is_admin, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /bookings — request a rental. The date conflict check and the
/// insert run atomically in the repository; this handler only does the
/// checks that cannot race (item lookup, delivery method, self-booking).
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBooking>,
) -> Result<(StatusCode, Json<DataResponse<Booking>>), AppError> {
    let range = DateRange::new(input.start_date, input.end_date)?;

    let profile = ensure_profile(&state, &auth).await?;
    let item = ItemRepo::find_by_id(&state.pool, input.item_id)
        .await?
        .ok_or_else(|| CoreError::not_found("item", input.item_id))?;

    if item.owner_id == profile.user_id {
        return Err(CoreError::Validation("cannot book your own item".to_string()).into());
    }
    delivery::validate_chosen(&input.delivery_method, &item.delivery_methods)?;

    let new_booking = NewBooking {
        item_id: item.id,
        renter_id: profile.user_id.clone(),
        owner_id: item.owner_id.clone(),
        range,
        delivery_method: input.delivery_method,
        price_per_day_cents: item.price_per_day_cents,
        deposit_cents: item.deposit_cents,
    };

    let booking = match BookingRepo::create(&state.pool, &new_booking).await? {
        CreateOutcome::Created(booking) => booking,
        CreateOutcome::Overlap => {
            return Err(CoreError::Conflict(
                "the requested dates are no longer available".to_string(),
            )
            .into())
        }
        CreateOutcome::ItemGone => {
            return Err(CoreError::not_found("item", input.item_id).into())
        }
    };

    tracing::info!(
        booking_id = %booking.id,
        item_id = %item.id,
        renter = %booking.renter_id,
        "booking requested"
    );
    state
        .notifier
        .notify(
            &booking.owner_id,
            notify::BOOKING_REQUESTED,
            format!(
                "New booking request for {} ({} to {})",
                item.title, booking.start_date, booking.end_date
            ),
            Some(booking_link(&booking)),
        )
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse::new(booking))))
}

/// GET /bookings/{id} — parties and admins only.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Booking>>, AppError> {
    let booking = find_for_party(&state, id, &auth).await?;
    Ok(Json(DataResponse::new(booking)))
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    /// `renter` (default) or `owner`.
    pub role: Option<String>,
}

/// GET /bookings — outgoing requests, or incoming with `?role=owner`.
pub async fn my_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<Booking>>>, AppError> {
    let bookings = match query.role.as_deref() {
        None | Some("renter") => BookingRepo::list_for_renter(&state.pool, &auth.user_id).await?,
        Some("owner") => BookingRepo::list_for_owner(&state.pool, &auth.user_id).await?,
        Some(other) => {
            return Err(CoreError::Validation(format!("unknown role: {other}")).into())
        }
    };
    Ok(Json(DataResponse::new(bookings)))
}

/// POST /bookings/{id}/{action} — the lifecycle endpoint. The action
/// name in the path is one of approve, reject, agree, deliver, return,
/// cancel.
pub async fn transition_booking(
    State(state): State<AppState>,
    Path((id, action)): Path<(Uuid, String)>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Booking>>, AppError> {
    let action = BookingAction::parse(&action)
        .ok_or_else(|| CoreError::Validation(format!("unknown booking action: {action}")))?;

    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("booking", id))?;
    let party = resolve_party(&state, &booking, &auth).await?;

    // Fast authorization check against the pre-image; the repository
    // re-runs the full state machine on the locked row.
    booking::authorize(action, party)?;

    let applied = match BookingRepo::transition(&state.pool, id, action, party, state.clock.now())
        .await?
    {
        TransitionResult::Applied(applied) => applied,
        TransitionResult::NotFound => return Err(CoreError::not_found("booking", id).into()),
        TransitionResult::Rejected(err) => return Err(err.into()),
    };

    tracing::info!(
        booking_id = %id,
        action = %action,
        party = party.as_str(),
        from = applied.previous_status.as_str(),
        to = %applied.booking.status,
        "booking transition"
    );
    notify_transition(&state, &applied, action, &auth.user_id).await;

    Ok(Json(DataResponse::new(applied.booking)))
}

pub(crate) fn booking_link(booking: &Booking) -> String {
    format!("/bookings/{}", booking.id)
}

/// Loads a booking and rejects callers who are neither party nor admin.
pub(crate) async fn find_for_party(
    state: &AppState,
    id: Uuid,
    auth: &AuthUser,
) -> Result<Booking, AppError> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("booking", id))?;
    resolve_party(state, &booking, auth).await?;
    Ok(booking)
}

/// Determines the caller's role for a booking, hitting the database for
/// the admin flag only when they are not a direct party.
async fn resolve_party(
    state: &AppState,
    booking: &Booking,
    auth: &AuthUser,
) -> Result<Party, AppError> {
    if booking.renter_id == auth.user_id {
        return Ok(Party::Renter);
    }
    if booking.owner_id == auth.user_id {
        return Ok(Party::Owner);
    }
    if is_admin(state, auth).await? {
        return Ok(Party::Admin);
    }
    Err(CoreError::Forbidden("not a party to this booking".to_string()).into())
}

/// Fans out the in-app notifications for an applied transition. The
/// item title makes messages readable; a retired item falls back to a
/// generic phrase.
async fn notify_transition(
    state: &AppState,
    applied: &AppliedTransition,
    action: BookingAction,
    actor_id: &str,
) {
    let booking = &applied.booking;
    let title = match ItemRepo::find_any_by_id(&state.pool, booking.item_id).await {
        Ok(Some(item)) => item.title,
        _ => "your booking".to_string(),
    };
    let link = Some(booking_link(booking));

    let (kind, message): (&'static str, String) = match action {
        BookingAction::Approve => (
            notify::BOOKING_APPROVED,
            format!("Your booking for {title} was approved"),
        ),
        BookingAction::Reject => (
            notify::BOOKING_REJECTED,
            format!("Your booking for {title} was declined"),
        ),
        BookingAction::Agree if applied.agreement_completed => (
            notify::BOOKING_AGREED,
            format!("Handover for {title} is agreed by both sides"),
        ),
        BookingAction::Agree => (
            notify::BOOKING_AGREED,
            format!("The other party agreed to the handover terms for {title}"),
        ),
        BookingAction::Deliver => (
            notify::BOOKING_DELIVERED,
            format!("{title} was marked as handed over"),
        ),
        BookingAction::Return => (
            notify::BOOKING_RETURNED,
            format!("{title} was marked as returned"),
        ),
        BookingAction::Cancel => (
            notify::BOOKING_CANCELLED,
            format!("The booking for {title} was cancelled"),
        ),
    };

    match booking.counterparty_of(actor_id) {
        Some(counterparty) => {
            state
                .notifier
                .notify(counterparty, kind, message, link)
                .await;
        }
        // Admin-initiated: both parties hear about it.
        None => {
            state
                .notifier
                .notify(&booking.renter_id, kind, message.clone(), link.clone())
                .await;
            state
                .notifier
                .notify(&booking.owner_id, kind, message, link)
                .await;
        }
    }
}
