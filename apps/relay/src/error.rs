use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tbm_core::ApiError;
use thiserror::Error;

/// Errors returned by the outward-facing API handlers, rendered as plain
/// text.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Upstream(#[from] ApiError),
}

impl RelayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        RelayError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Upstream failures are already logged by the client that made the call.
        (self.status(), self.to_string()).into_response()
    }
}
