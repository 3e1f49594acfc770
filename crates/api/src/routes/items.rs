//! Route definitions for the `/items` resource.
//!
//! Listing reads are public; everything that writes requires a token.

use axum::routing::get;
use axum::Router;

use crate::handlers::{items, reviews};
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /                          -> list_items (public, q/category filters)
/// POST   /                          -> create_item
/// GET    /mine                      -> my_items
/// GET    /by-short-id/{short_id}    -> get_item_by_short_id (public)
/// GET    /{id}                      -> get_item (public)
/// PUT    /{id}                      -> update_item
/// DELETE /{id}                      -> delete_item
/// GET    /{id}/booked-ranges        -> get_availability (public)
/// GET    /{id}/reviews              -> list_item_reviews (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route("/mine", get(items::my_items))
        .route("/by-short-id/{short_id}", get(items::get_item_by_short_id))
        .route(
            "/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/{id}/booked-ranges", get(items::get_availability))
        .route("/{id}/reviews", get(reviews::list_item_reviews))
}
