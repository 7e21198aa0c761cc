use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use clipboard_types::api::CreateUserRequest;

use crate::blocking;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(move || {
        state
            .users
            .create_user(&req.username, &req.nickname, &req.status)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
