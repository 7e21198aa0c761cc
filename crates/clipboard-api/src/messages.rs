use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use clipboard_types::api::{CreateMessageRequest, PageQuery, PatchMessageRequest, SpanQuery};
use clipboard_types::models::MessageDetail;

use crate::blocking;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = blocking(move || {
        state
            .messages
            .create_message(req.channel_id, req.author_id, &req.content, &req.tags)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<MessageDetail>, ApiError> {
    let detail = blocking(move || state.messages.get_message(message_id)).await?;
    Ok(Json(detail))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<MessageDetail>>, ApiError> {
    let details =
        blocking(move || state.messages.get_messages(channel_id, page.limit, page.offset)).await?;
    Ok(Json(details))
}

pub async fn get_messages_in_range(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
    Query(span): Query<SpanQuery>,
) -> Result<Json<Vec<MessageDetail>>, ApiError> {
    let details = blocking(move || {
        state
            .messages
            .get_messages_in_range(channel_id, span.start, span.end)
    })
    .await?;
    Ok(Json(details))
}

pub async fn get_pinned(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDetail>>, ApiError> {
    let details = blocking(move || state.messages.get_pinned(channel_id)).await?;
    Ok(Json(details))
}

pub async fn patch_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    Json(req): Json<PatchMessageRequest>,
) -> Result<Json<MessageDetail>, ApiError> {
    let detail = blocking(move || {
        state
            .messages
            .patch_message(message_id, req.content.as_deref())
    })
    .await?;
    Ok(Json(detail))
}

pub async fn pin_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    blocking(move || state.messages.pin(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unpin_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    blocking(move || state.messages.unpin(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    blocking(move || state.messages.delete_message(message_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
