//! HTTP mapping for service failures.
//!
//! Every handler returns `Result<_, ApiError>`; the body is always an
//! [`ErrorResponse`] so clients can branch on the `error` kind.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use clipboard_core::ClipError;
use clipboard_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by a service (status depends on the class)
    #[error(transparent)]
    Clip(#[from] ClipError),

    /// Request could not be served at all, e.g. the blocking task died (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Clip(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Clip(ClipError::MessageNotFound) => StatusCode::NOT_FOUND,
            ApiError::Clip(ClipError::AlreadyPinned | ClipError::NotPinned | ClipError::AlreadyExists) => {
                StatusCode::CONFLICT
            }
            ApiError::Clip(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (kind, message) = match &self {
            ApiError::Clip(ClipError::Storage(e)) => {
                error!("storage failure: {:#}", e);
                ("storage", "internal storage error".to_string())
            }
            ApiError::Clip(e) => (e.kind(), e.to_string()),
            ApiError::Internal(_) => ("internal", "internal server error".to_string()),
        };

        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
