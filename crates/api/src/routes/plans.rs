//! Route definitions for the public `/plans` catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::plans;
use crate::state::AppState;

/// Routes mounted at `/plans`.
///
/// ```text
/// GET    /                  -> list_plans (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(plans::list_plans))
}
