//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - the query string could not be read",
    content_type = "application/json",
    example = json!({
        "error": "Invalid request parameters",
        "code": 400,
        "details": "Failed to deserialize query string",
        "timestamp": "2024-01-15T10:30:00Z"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Failed to fetch products",
        "code": 500,
        "timestamp": "2024-01-15T10:30:00Z"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Not Found",
    content_type = "application/json",
    example = json!({
        "error": "Product not found",
        "code": 404,
        "timestamp": "2024-01-15T10:30:00Z"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing or invalid bearer token",
    content_type = "application/json",
    example = json!({
        "error": "Invalid or missing bearer token",
        "code": 401,
        "timestamp": "2024-01-15T10:30:00Z"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);
