//! Server infrastructure: router assembly, serving and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes);
//! create_production_app(router, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod app;
pub mod shutdown;

pub use app::{create_production_app, create_router, serve_with_shutdown};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
