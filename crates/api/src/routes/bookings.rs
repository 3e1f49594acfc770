//! Route definitions for the `/bookings` resource.
//!
//! Everything here requires authentication; access within a booking is
//! limited to its two parties (plus admins for reads and cancel).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, messages, reviews};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// The `{action}` segment covers the six lifecycle verbs (`approve`,
/// `reject`, `agree`, `deliver`, `return`, `cancel`); static segments
/// like `reviews` take precedence over it.
///
/// ```text
/// GET    /                  -> my_bookings (?role=renter|owner)
/// POST   /                  -> create_booking
/// GET    /{id}              -> get_booking
/// POST   /{id}/{action}     -> transition_booking
/// GET    /{id}/reviews      -> list_booking_reviews
/// POST   /{id}/reviews      -> create_review
/// GET    /{id}/messages     -> list_messages
/// POST   /{id}/messages     -> send_message
/// POST   /{id}/block        -> block_chat
/// DELETE /{id}/block        -> unblock_chat
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::my_bookings).post(bookings::create_booking))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/{action}", post(bookings::transition_booking))
        .route(
            "/{id}/reviews",
            get(reviews::list_booking_reviews).post(reviews::create_review),
        )
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route(
            "/{id}/block",
            post(messages::block_chat).delete(messages::unblock_chat),
        )
}
