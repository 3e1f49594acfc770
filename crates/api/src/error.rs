//! Error-to-response mapping.
//!
//! Every error leaving a handler becomes `{"error": <message>, "code":
//! <CODE>}` with a status from the domain taxonomy. Database errors are
//! classified so constraint violations surface as conflicts rather than
//! opaque 500s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use unajmi_core::error::CoreError;

use crate::storage::MediaError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl AppError {
    fn status_message_code(&self) -> (StatusCode, String, &'static str) {
        match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Media(err) => classify_media_error(err),
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message.clone(), "VALIDATION")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, code) = self.status_message_code();
        if status.is_server_error() {
            tracing::error!(%status, code, error = %self, "request failed");
        } else {
            tracing::debug!(%status, code, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, String, &'static str) {
    let (status, code) = match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        CoreError::QuotaExceeded { .. } => (StatusCode::FORBIDDEN, "QUOTA_EXCEEDED"),
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        CoreError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        CoreError::CodeAlreadyUsed => (StatusCode::CONFLICT, "CODE_ALREADY_USED"),
        CoreError::AlreadyReviewed => (StatusCode::CONFLICT, "ALREADY_REVIEWED"),
        CoreError::AlreadyBlocked => (StatusCode::CONFLICT, "ALREADY_BLOCKED"),
        CoreError::CodeExpired => (StatusCode::GONE, "CODE_EXPIRED"),
        CoreError::NotEligible(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NOT_ELIGIBLE"),
        CoreError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    };
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, message, code)
}

/// Maps constraint violations to client errors. `23505` is a unique
/// violation, `23P01` an exclusion violation (booking overlap), `23503`
/// a foreign-key violation; everything else is a server fault.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "resource not found".to_string(),
            "NOT_FOUND",
        ),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => (
                StatusCode::CONFLICT,
                "a resource with these values already exists".to_string(),
                "CONFLICT",
            ),
            Some("23P01") => (
                StatusCode::CONFLICT,
                "the requested dates are no longer available".to_string(),
                "CONFLICT",
            ),
            Some("23503") => (
                StatusCode::CONFLICT,
                "referenced resource does not exist".to_string(),
                "CONFLICT",
            ),
            _ => internal(),
        },
        _ => internal(),
    }
}

fn classify_media_error(err: &MediaError) -> (StatusCode, String, &'static str) {
    match err {
        MediaError::UnsupportedType(_) | MediaError::InvalidId => {
            (StatusCode::BAD_REQUEST, err.to_string(), "VALIDATION")
        }
        MediaError::Io(_) => internal(),
    }
}

fn internal() -> (StatusCode, String, &'static str) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error".to_string(),
        "INTERNAL",
    )
}

/// True when `err` is a Postgres unique violation, optionally on one
/// specific constraint. Used by callers that retry generated values.
pub fn is_unique_violation(err: &sqlx::Error, constraint: Option<&str>) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && constraint.is_none_or(|name| db_err.constraint() == Some(name))
        }
        _ => false,
    }
}
