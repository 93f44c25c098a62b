use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::ErrorResponse;

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    (
        status,
        Json(ErrorResponse::new(
            status,
            "The requested resource was not found",
        )),
    )
        .into_response()
}

/// Response for routes that exist but not for the requested method.
pub async fn method_not_allowed() -> Response {
    let status = StatusCode::METHOD_NOT_ALLOWED;
    (
        status,
        Json(ErrorResponse::new(
            status,
            "The HTTP method is not allowed for this resource",
        )),
    )
        .into_response()
}
