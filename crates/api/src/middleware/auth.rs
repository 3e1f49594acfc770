//! Request authentication.
//!
//! [`AuthUser`] is an extractor: any handler that takes it rejects
//! unauthenticated requests with 401 before the handler body runs.
//! Token validation is pure; profile provisioning is a separate,
//! explicit step so read-only endpoints stay write-free.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use unajmi_core::error::CoreError;
use unajmi_db::models::profile::Profile;
use unajmi_db::repositories::profile_repo::ProfileRepo;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("authorization header is not a bearer token"))?;

        let claims = jwt::validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Upserts the caller's profile, provisioning first-time users on the
/// free plan. Call this in every handler that writes on the user's
/// behalf or reads their own profile data.
pub async fn ensure_profile(state: &AppState, auth: &AuthUser) -> Result<Profile, AppError> {
    let profile = ProfileRepo::ensure(
        &state.pool,
        &auth.user_id,
        auth.email.as_deref(),
        auth.display_name.as_deref(),
    )
    .await?;
    Ok(profile)
}

/// Admin gate: provisions the profile, then rejects non-superadmins.
pub async fn require_admin(state: &AppState, auth: &AuthUser) -> Result<Profile, AppError> {
    let profile = ensure_profile(state, auth).await?;
    if !profile.is_superadmin {
        return Err(AppError::Core(CoreError::Forbidden(
            "administrator access required".to_string(),
        )));
    }
    Ok(profile)
}

/// True when the caller has the superadmin flag; used where admins get
/// wider access to other users' resources.
pub async fn is_admin(state: &AppState, auth: &AuthUser) -> Result<bool, AppError> {
    let flag = ProfileRepo::is_superadmin(&state.pool, &auth.user_id).await?;
    Ok(flag)
}
