use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use unajmi_core::error::CoreError;
use unajmi_core::types::DbId;
use unajmi_db::models::notification::Notification;
use unajmi_db::repositories::notification_repo::NotificationRepo;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

#[derive(Debug, Serialize)]
pub struct AffectedCount {
    pub affected: u64,
}

/// GET /notifications — newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<DataResponse<Vec<Notification>>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let notifications = NotificationRepo::list_for_user(&state.pool, &auth.user_id, limit).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<UnreadCount>>, AppError> {
    let unread = NotificationRepo::unread_count(&state.pool, &auth.user_id).await?;
    Ok(Json(DataResponse::new(UnreadCount { unread })))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth: AuthUser,
) -> Result<Json<DataResponse<UnreadCount>>, AppError> {
    if !NotificationRepo::mark_read(&state.pool, id, &auth.user_id).await? {
        return Err(CoreError::not_found("notification", id).into());
    }
    let unread = NotificationRepo::unread_count(&state.pool, &auth.user_id).await?;
    Ok(Json(DataResponse::new(UnreadCount { unread })))
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<AffectedCount>>, AppError> {
    let affected = NotificationRepo::mark_all_read(&state.pool, &auth.user_id).await?;
    Ok(Json(DataResponse::new(AffectedCount { affected })))
}

/// DELETE /notifications
pub async fn delete_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<AffectedCount>>, AppError> {
    let affected = NotificationRepo::delete_all(&state.pool, &auth.user_id).await?;
    Ok(Json(DataResponse::new(AffectedCount { affected })))
}
