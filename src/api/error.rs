//! Translation of service errors into HTTP responses.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{FetchError, PreviewError};

/// Error body returned by the API.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error kind: `fetch`, `parse` or `validation`.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// HTTP-facing error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error kind.
    pub fn kind(&self) -> &'static str {
        self.body.error
    }
}

/// Status code for a preview failure.
pub fn status_for(err: &PreviewError) -> StatusCode {
    match err {
        PreviewError::Validation(_) => StatusCode::BAD_REQUEST,
        PreviewError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PreviewError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        PreviewError::Fetch(FetchError::BodyTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        PreviewError::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}

impl From<PreviewError> for ApiError {
    fn from(err: PreviewError) -> Self {
        Self {
            status: status_for(&err),
            body: ErrorResponse {
                error: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: "validation",
                message: rejection.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
