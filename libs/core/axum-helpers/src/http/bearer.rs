use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::errors::AppError;

/// Expected static bearer token. `None` disables the check.
#[derive(Clone, Debug, Default)]
pub struct BearerToken(Option<Arc<str>>);

impl BearerToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.map(Arc::from))
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    fn accepts(&self, presented: Option<&str>) -> bool {
        match (&self.0, presented) {
            (None, _) => true,
            (Some(expected), Some(token)) => expected.as_ref() == token,
            (Some(_), None) => false,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Rejects requests whose bearer token does not match the configured one.
///
/// ```ignore
/// let routes = Router::new()
///     .route("/products", get(list))
///     .layer(axum::middleware::from_fn_with_state(
///         BearerToken::new(Some("secret".into())),
///         require_bearer_token,
///     ));
/// ```
pub async fn require_bearer_token(
    State(expected): State<BearerToken>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !expected.accepts(extract_bearer(&headers)) {
        tracing::debug!(path = %request.uri().path(), "Rejected request with bad bearer token");
        return Err(AppError::Unauthorized(
            "Invalid or missing bearer token".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
