pub mod handlers;
pub mod responses;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
///
/// ```json
/// {
///   "error": "Product not found",
///   "code": 404,
///   "timestamp": "2024-01-15T10:30:00Z"
/// }
/// ```
///
/// `code` mirrors the HTTP status. `details` is only present when the
/// server has something safe to add for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// HTTP status code
    pub code: u16,
    /// Optional additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// When the error was produced
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: status.as_u16(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type that renders as an [`ErrorResponse`].
///
/// Internal failures carry two messages: `message` goes to the caller,
/// `cause` is only written to the log.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl AppError {
    /// Internal error with a caller-safe message and a logged cause.
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        AppError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(details) => {
                tracing::info!(status = status.as_u16(), "Bad request: {}", details);
                let body = ErrorResponse::new(status, "Invalid request parameters")
                    .with_details(details);
                return (status, Json(body)).into_response();
            }
            AppError::Unauthorized(msg) => {
                tracing::info!(status = status.as_u16(), "Unauthorized: {}", msg);
                msg
            }
            AppError::NotFound(msg) => {
                tracing::info!(status = status.as_u16(), "Not found: {}", msg);
                msg
            }
            AppError::Internal { message, cause } => {
                tracing::error!(status = status.as_u16(), error = %cause, "{}", message);
                message
            }
        };

        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}
