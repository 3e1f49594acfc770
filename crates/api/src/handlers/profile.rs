use axum::extract::State;
use axum::Json;

use unajmi_core::error::CoreError;
use unajmi_db::models::profile::{Profile, UpdateProfile, DASHBOARD_MODES};
use unajmi_db::repositories::profile_repo::ProfileRepo;

use crate::error::AppError;
use crate::middleware::auth::{ensure_profile, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_DISPLAY_NAME: usize = 120;

/// GET /me/profile — provisions the row on first contact.
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Profile>>, AppError> {
    let profile = ensure_profile(&state, &auth).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// PUT /me/profile — display name and dashboard mode; omitted fields
/// keep their value.
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<DataResponse<Profile>>, AppError> {
    if let Some(name) = input.display_name.as_deref() {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_DISPLAY_NAME {
            return Err(CoreError::Validation(format!(
                "display_name must be 1 to {MAX_DISPLAY_NAME} characters"
            ))
            .into());
        }
    }
    if let Some(mode) = input.default_dashboard_mode.as_deref() {
        if !DASHBOARD_MODES.contains(&mode) {
            return Err(CoreError::Validation(format!(
                "default_dashboard_mode must be one of: {}",
                DASHBOARD_MODES.join(", ")
            ))
            .into());
        }
    }

    ensure_profile(&state, &auth).await?;
    let profile = ProfileRepo::update_settings(&state.pool, &auth.user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("profile", &auth.user_id))?;
    Ok(Json(DataResponse::new(profile)))
}
