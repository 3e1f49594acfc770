use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use unajmi_core::error::CoreError;
use unajmi_core::notify;
use unajmi_db::models::message::{ChatBlock, CreateMessage, Message};
use unajmi_db::repositories::chat_block_repo::ChatBlockRepo;
use unajmi_db::repositories::item_repo::ItemRepo;
use unajmi_db::repositories::message_repo::MessageRepo;

use crate::error::AppError;
use crate::handlers::bookings::{booking_link, find_for_party};
use crate::middleware::auth::{is_admin, AuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

const BLOCK_NOTICE: &str = "This conversation has been blocked.";

/// GET /bookings/{id}/messages — parties and admins can read a thread.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<Json<DataResponse<Vec<Message>>>, AppError> {
    let booking = find_for_party(&state, id, &auth).await?;
    let messages = MessageRepo::list_for_booking(&state.pool, booking.id).await?;
    Ok(Json(DataResponse::new(messages)))
}

/// POST /bookings/{id}/messages — only the two parties may write, and
/// only while the thread is not blocked.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
    Json(input): Json<CreateMessage>,
) -> Result<(StatusCode, Json<DataResponse<Message>>), AppError> {
    input.validate()?;

    let booking = find_for_party(&state, id, &auth).await?;
    if !booking.involves(&auth.user_id) {
        return Err(CoreError::Forbidden(
            "only booking parties can write in this thread".to_string(),
        )
        .into());
    }
    if ChatBlockRepo::find(&state.pool, booking.id).await?.is_some() {
        return Err(CoreError::Forbidden("this conversation is blocked".to_string()).into());
    }

    let message =
        MessageRepo::create(&state.pool, booking.id, &auth.user_id, &input.body, false).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

/// POST /bookings/{id}/block — either party freezes the thread. A
/// system notice lands in the thread and the counterparty is notified.
pub async fn block_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<DataResponse<ChatBlock>>), AppError> {
    let booking = find_for_party(&state, id, &auth).await?;
    if !booking.involves(&auth.user_id) {
        return Err(CoreError::Forbidden(
            "only booking parties can block this thread".to_string(),
        )
        .into());
    }

    let block = ChatBlockRepo::create(&state.pool, booking.id, &auth.user_id, BLOCK_NOTICE)
        .await?
        .ok_or(CoreError::AlreadyBlocked)?;

    if let Some(counterparty) = booking.counterparty_of(&auth.user_id) {
        let title = match ItemRepo::find_any_by_id(&state.pool, booking.item_id).await {
            Ok(Some(item)) => item.title,
            _ => "a booking".to_string(),
        };
        state
            .notifier
            .notify(
                counterparty,
                notify::CHAT_BLOCKED,
                format!("The conversation about {title} was blocked"),
                Some(booking_link(&booking)),
            )
            .await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse::new(block))))
}

/// DELETE /bookings/{id}/block — only the blocker or an admin may lift
/// a block.
pub async fn unblock_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    let booking = find_for_party(&state, id, &auth).await?;
    let block = ChatBlockRepo::find(&state.pool, booking.id)
        .await?
        .ok_or_else(|| CoreError::not_found("chat block", booking.id))?;

    if block.blocked_by != auth.user_id && !is_admin(&state, &auth).await? {
        return Err(CoreError::Forbidden(
            "only the blocker or an admin can unblock this thread".to_string(),
        )
        .into());
    }

    ChatBlockRepo::remove(&state.pool, booking.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
