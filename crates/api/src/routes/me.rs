//! Route definitions for the `/me` resource: the caller's own profile
//! and plan standing.

use axum::routing::get;
use axum::Router;

use crate::handlers::{plans, profile};
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /plan              -> my_plan
/// GET    /profile           -> my_profile (provisions on first call)
/// PUT    /profile           -> update_my_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", get(plans::my_plan))
        .route(
            "/profile",
            get(profile::my_profile).put(profile::update_my_profile),
        )
}
