use axum::extract::State;
use axum::Json;

use unajmi_core::error::CoreError;
use unajmi_core::plans;
use unajmi_db::models::plan::Plan;
use unajmi_db::models::profile::{PlanStatus, Profile};
use unajmi_db::repositories::item_repo::ItemRepo;
use unajmi_db::repositories::plan_repo::PlanRepo;

use crate::error::AppError;
use crate::middleware::auth::{ensure_profile, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /plans — public catalog of subscribable tiers.
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Plan>>>, AppError> {
    let plans = PlanRepo::list_public(&state.pool).await?;
    Ok(Json(DataResponse::new(plans)))
}

/// GET /me/plan — the caller's effective plan standing.
pub async fn my_plan(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<PlanStatus>>, AppError> {
    let profile = ensure_profile(&state, &auth).await?;
    let status = plan_status_for(&state, &profile).await?;
    Ok(Json(DataResponse::new(status)))
}

/// Resolves a profile's effective plan. An expired paid plan degrades
/// to the free tier at evaluation time; nothing is rewritten in the
/// database, so a renewal restores the paid limits untouched.
pub(crate) async fn plan_status_for(
    state: &AppState,
    profile: &Profile,
) -> Result<PlanStatus, AppError> {
    let now = state.clock.now();
    let assigned = PlanRepo::find_by_id(&state.pool, profile.plan_id)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "profile {} references missing plan {}",
                profile.user_id, profile.plan_id
            ))
        })?;

    let active = plans::plan_is_active(profile.plan_expires_at, now);
    let effective = if active {
        assigned
    } else {
        PlanRepo::free_plan(&state.pool).await?
    };

    let active_listings = ItemRepo::count_active_for_owner(&state.pool, &profile.user_id).await?;
    let max_listings = effective.max_listings;
    let can_create_listing = !plans::listing_quota_reached(max_listings, active_listings);
    let has_badge = active && effective.has_badge;

    Ok(PlanStatus {
        plan_expires_at: profile.plan_expires_at,
        expired: !active,
        active_listings,
        max_listings,
        can_create_listing,
        allowed_delivery_methods: effective.allowed_delivery_methods.clone(),
        has_badge,
        plan: effective,
    })
}
