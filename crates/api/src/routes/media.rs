//! Route definitions for `/media`: upload-url issuance and the upload
//! target itself.

use axum::extract::DefaultBodyLimit;
use axum::routing::{post, put};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Uploads are listing photos; anything bigger than this is rejected
/// before it buffers.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Routes mounted at `/media`.
///
/// ```text
/// POST   /upload-url        -> issue_upload_url
/// PUT    /{media_id}        -> upload_media (raw bytes)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-url", post(media::issue_upload_url))
        .route("/{media_id}", put(media::upload_media))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
