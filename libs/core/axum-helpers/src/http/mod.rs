//! HTTP middleware: CORS, security headers and the static bearer-token gate.
//!
//! ```ignore
//! use axum_helpers::http::{create_permissive_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_permissive_cors_layer());
//! ```

pub mod bearer;
pub mod cors;
pub mod security;

pub use bearer::{BearerToken, require_bearer_token};
pub use cors::create_permissive_cors_layer;
pub use security::security_headers;
