pub mod error;
pub mod messages;
pub mod state;
pub mod tags;
pub mod users;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tracing::error;

pub use crate::error::ApiError;
pub use crate::state::{AppState, AppStateInner};

/// Every route the service exposes, mounted under `/api/v1`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/users", post(users::create_user))
        .route("/messages", post(messages::create_message))
        .route(
            "/messages/{message_id}",
            get(messages::get_message)
                .patch(messages::patch_message)
                .delete(messages::delete_message),
        )
        .route("/messages/{message_id}/pin", post(messages::pin_message))
        .route("/messages/{message_id}/unpin", post(messages::unpin_message))
        .route("/messages/{message_id}/tags", put(tags::modify_tags))
        .route("/channels/{channel_id}/messages", get(messages::get_messages))
        .route("/channels/{channel_id}/messages/span", get(messages::get_messages_in_range))
        .route("/channels/{channel_id}/messages/pinned", get(messages::get_pinned))
        .route(
            "/channels/{channel_id}/tags/{tag}/messages",
            get(tags::find_by_tag_in_channel),
        )
        .route("/tags/{tag}/messages", get(tags::find_by_tag))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run a synchronous service call off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> clipboard_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}
