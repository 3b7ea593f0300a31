//! API error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearth_application::{RepositoryError, SendMessageError};
use tracing::error;

/// An error rendered as an HTTP status plus a JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        let status = match e {
            RepositoryError::ChatNotFound(_) | RepositoryError::UserNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            RepositoryError::UserExists(_) => StatusCode::CONFLICT,
            RepositoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::with_status(status, e.to_string())
    }
}

impl From<SendMessageError> for ApiError {
    fn from(e: SendMessageError) -> Self {
        match e {
            SendMessageError::EmptyMessage => Self::bad_request(e.to_string()),
            SendMessageError::Repository(inner) => inner.into(),
        }
    }
}
