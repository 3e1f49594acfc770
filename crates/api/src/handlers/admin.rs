use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use unajmi_core::error::CoreError;
use unajmi_core::types::DbId;
use unajmi_core::{notify, plans, promo};
use unajmi_db::models::profile::PlanStatus;
use unajmi_db::models::promo_code::{AssignPlan, CreatePromoCode, PromoCode};
use unajmi_db::repositories::plan_repo::PlanRepo;
use unajmi_db::repositories::profile_repo::ProfileRepo;
use unajmi_db::repositories::promo_code_repo::PromoCodeRepo;

use crate::error::{is_unique_violation, AppError};
use crate::handlers::plans::plan_status_for;
use crate::handlers::promo::notify_if_over_quota;
use crate::middleware::auth::{require_admin, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

const CODE_UNIQUE_CONSTRAINT: &str = "promo_codes_code_key";
const GENERATE_ATTEMPTS: usize = 5;

/// POST /admin/promo-codes — mints a code, generating one when the
/// request does not name it.
pub async fn create_promo_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePromoCode>,
) -> Result<(StatusCode, Json<DataResponse<PromoCode>>), AppError> {
    let admin = require_admin(&state, &auth).await?;
    input.validate()?;

    let plan = PlanRepo::find_by_slug(&state.pool, &input.plan_slug)
        .await?
        .ok_or_else(|| CoreError::not_found("plan", &input.plan_slug))?;
    if input.valid_until <= state.clock.now() {
        return Err(CoreError::Validation("valid_until must be in the future".to_string()).into());
    }

    let code = match input.code.as_deref() {
        Some(raw) => {
            let code = promo::normalize(raw);
            promo::validate_format(&code)?;
            match PromoCodeRepo::create(
                &state.pool,
                &code,
                plan.id,
                input.duration_months,
                input.valid_until,
                &admin.user_id,
            )
            .await
            {
                Ok(code) => code,
                Err(err) if is_unique_violation(&err, Some(CODE_UNIQUE_CONSTRAINT)) => {
                    return Err(CoreError::Conflict(format!("code {code} already exists")).into());
                }
                Err(err) => return Err(err.into()),
            }
        }
        None => generate_unique_code(&state, &admin.user_id, plan.id, &input).await?,
    };

    tracing::info!(code = %code.code, plan = %plan.slug, "promo code created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(code))))
}

/// Generated codes can collide with existing ones; retry a few times
/// before giving up.
async fn generate_unique_code(
    state: &AppState,
    created_by: &str,
    plan_id: DbId,
    input: &CreatePromoCode,
) -> Result<PromoCode, AppError> {
    for _ in 0..GENERATE_ATTEMPTS {
        let candidate = promo::generate(&mut rand::rng());
        match PromoCodeRepo::create(
            &state.pool,
            &candidate,
            plan_id,
            input.duration_months,
            input.valid_until,
            created_by,
        )
        .await
        {
            Ok(code) => return Ok(code),
            Err(err) if is_unique_violation(&err, Some(CODE_UNIQUE_CONSTRAINT)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(CoreError::Internal("could not generate a unique promo code".to_string()).into())
}

/// GET /admin/promo-codes
pub async fn list_promo_codes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<PromoCode>>>, AppError> {
    require_admin(&state, &auth).await?;
    let codes = PromoCodeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(codes)))
}

/// PUT /admin/profiles/{user_id}/plan — puts an existing user on a plan
/// directly, bypassing payment.
pub async fn assign_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    auth: AuthUser,
    Json(input): Json<AssignPlan>,
) -> Result<Json<DataResponse<PlanStatus>>, AppError> {
    require_admin(&state, &auth).await?;
    input.validate()?;

    ProfileRepo::find(&state.pool, &user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("profile", &user_id))?;
    let plan = PlanRepo::find_by_slug(&state.pool, &input.plan_slug)
        .await?
        .ok_or_else(|| CoreError::not_found("plan", &input.plan_slug))?;

    let expires_at = plans::plan_expiry(state.clock.now(), input.duration_months)?;
    let profile = ProfileRepo::set_plan(&state.pool, &user_id, &plan, expires_at)
        .await?
        .ok_or_else(|| CoreError::not_found("profile", &user_id))?;

    tracing::info!(user_id = %user_id, plan = %plan.slug, "plan assigned");
    state
        .notifier
        .notify(
            &user_id,
            notify::PLAN_CHANGED,
            format!("Your plan is now {}", plan.name),
            Some("/me/plan".to_string()),
        )
        .await;

    let status = plan_status_for(&state, &profile).await?;
    notify_if_over_quota(&state, &profile, &status).await;
    Ok(Json(DataResponse::new(status)))
}
