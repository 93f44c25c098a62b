//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: router assembly, serving, graceful shutdown
//! - **[`http`]**: middleware (CORS, security headers, static bearer token)
//! - **[`errors`]**: the JSON error body and [`AppError`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!     let config = ServerConfig::default();
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod http;
pub mod server;

pub use server::{
    ShutdownCoordinator, create_production_app, create_router, serve_with_shutdown,
    shutdown_signal,
};

pub use http::{
    BearerToken, create_permissive_cors_layer, require_bearer_token, security_headers,
};

pub use errors::{AppError, ErrorResponse};
