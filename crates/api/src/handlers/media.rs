use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::UploadTicket;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub content_type: String,
}

/// POST /media/upload-url — mints an id and tells the client where to
/// PUT the bytes.
pub async fn issue_upload_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UploadRequest>,
) -> Result<(StatusCode, Json<DataResponse<UploadTicket>>), AppError> {
    let ticket = state.media.issue_upload(&input.content_type)?;
    tracing::debug!(media_id = %ticket.media_id, user_id = %auth.user_id, "upload url issued");
    Ok((StatusCode::CREATED, Json(DataResponse::new(ticket))))
}

/// PUT /media/{id} — accepts the bytes for a previously issued id.
pub async fn upload_media(
    State(state): State<AppState>,
    Path(media_id): Path<String>,
    _auth: AuthUser,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state.media.store(&media_id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}
