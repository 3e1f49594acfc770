//! Route definitions for user-scoped reviews, mounted at `/users`.
//! Item- and booking-scoped review routes live with their parents.

use axum::routing::get;
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{user_id}/reviews -> list_user_reviews (public)
/// ```
pub fn user_router() -> Router<AppState> {
    Router::new().route("/{user_id}/reviews", get(reviews::list_user_reviews))
}
