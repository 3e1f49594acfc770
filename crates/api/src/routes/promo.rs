//! Route definitions for `/promo-codes`: user-facing redemption.
//! Minting and listing codes live under `/admin`.

use axum::routing::post;
use axum::Router;

use crate::handlers::promo;
use crate::state::AppState;

/// Routes mounted at `/promo-codes`.
///
/// ```text
/// POST   /redeem            -> redeem_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/redeem", post(promo::redeem_code))
}
