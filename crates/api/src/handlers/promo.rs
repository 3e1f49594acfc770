use axum::extract::State;
use axum::Json;

use unajmi_core::error::CoreError;
use unajmi_core::{notify, plans, promo};
use unajmi_db::models::profile::{PlanStatus, Profile};
use unajmi_db::models::promo_code::RedeemCode;
use unajmi_db::repositories::promo_code_repo::{PromoCodeRepo, RedeemOutcome};

use crate::error::AppError;
use crate::handlers::plans::plan_status_for;
use crate::middleware::auth::{ensure_profile, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /promo-codes/redeem — burns the code and moves the caller onto
/// its plan in one transaction.
pub async fn redeem_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<RedeemCode>,
) -> Result<Json<DataResponse<PlanStatus>>, AppError> {
    let code = promo::normalize(&input.code);
    promo::validate_format(&code)?;

    ensure_profile(&state, &auth).await?;
    let outcome =
        PromoCodeRepo::redeem(&state.pool, &code, &auth.user_id, state.clock.now()).await?;

    let (plan, profile) = match outcome {
        RedeemOutcome::Redeemed { plan, profile } => (plan, profile),
        RedeemOutcome::NotFound => return Err(CoreError::not_found("promo code", code).into()),
        RedeemOutcome::AlreadyUsed => return Err(CoreError::CodeAlreadyUsed.into()),
        RedeemOutcome::Expired => return Err(CoreError::CodeExpired.into()),
    };

    tracing::info!(code = %code, user_id = %auth.user_id, plan = %plan.slug, "promo code redeemed");
    state
        .notifier
        .notify(
            &auth.user_id,
            notify::PLAN_CHANGED,
            format!("Your plan is now {}", plan.name),
            Some("/me/plan".to_string()),
        )
        .await;

    let status = plan_status_for(&state, &profile).await?;
    notify_if_over_quota(&state, &profile, &status).await;
    Ok(Json(DataResponse::new(status)))
}

/// Tells a user when a plan change leaves them with more live listings
/// than the new plan allows. Existing listings stay up; creating new
/// ones is paused until they are back under the limit.
pub(crate) async fn notify_if_over_quota(state: &AppState, profile: &Profile, status: &PlanStatus) {
    if status.max_listings == plans::UNLIMITED_LISTINGS {
        return;
    }
    if status.active_listings <= i64::from(status.max_listings) {
        return;
    }
    state
        .notifier
        .notify(
            &profile.user_id,
            notify::LISTINGS_OVER_QUOTA,
            format!(
                "You have {} active listings but your plan allows {}. \
                 They stay live, but new listings are paused until you are under the limit",
                status.active_listings, status.max_listings
            ),
            Some("/me/plan".to_string()),
        )
        .await;
}
