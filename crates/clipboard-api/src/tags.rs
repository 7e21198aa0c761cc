use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use clipboard_types::api::{ModifyTagsRequest, PageQuery};
use clipboard_types::models::MessageDetail;

use crate::blocking;
use crate::error::ApiError;
use crate::state::AppState;

/// Replace the message's whole tag set. An empty list clears it.
pub async fn modify_tags(
    State(state): State<AppState>,
    Path(message_id): Path<Uuid>,
    Json(req): Json<ModifyTagsRequest>,
) -> Result<Json<MessageDetail>, ApiError> {
    let detail = blocking(move || state.tags.modify_tags(message_id, &req.tags)).await?;
    Ok(Json(detail))
}

pub async fn find_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<MessageDetail>>, ApiError> {
    let details = blocking(move || state.tags.find_by_tag(&tag, page.limit, page.offset)).await?;
    Ok(Json(details))
}

pub async fn find_by_tag_in_channel(
    State(state): State<AppState>,
    Path((channel_id, tag)): Path<(Uuid, String)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<MessageDetail>>, ApiError> {
    let details = blocking(move || {
        state
            .tags
            .find_by_tag_in_channel(channel_id, &tag, page.limit, page.offset)
    })
    .await?;
    Ok(Json(details))
}
