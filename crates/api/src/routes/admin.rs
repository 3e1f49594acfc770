//! Route definitions for `/admin`. Every handler here re-checks the
//! superadmin flag itself; there is no blanket middleware gate.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /promo-codes                   -> list_promo_codes
/// POST   /promo-codes                   -> create_promo_code
/// PUT    /profiles/{user_id}/plan       -> assign_plan
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/promo-codes",
            get(admin::list_promo_codes).post(admin::create_promo_code),
        )
        .route("/profiles/{user_id}/plan", put(admin::assign_plan))
}
