//! # Catalog Client
//!
//! Typed access to the catalog API plus the client-side state that views
//! are built on.
//!
//! - **[`client`]**: [`CatalogClient`] over `reqwest`, and the [`CatalogApi`] trait
//! - **[`hooks`]**: fetch-state containers for the product list, a single
//!   product and inventory, with polling
//! - **[`fallback`]**: the built-in product list for offline rendering

pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod hooks;

pub use client::{CatalogApi, CatalogClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use fallback::{ExpiryWindow, FallbackFilter, LocalCatalog, ProductSummary};
pub use hooks::{FetchState, InventoryHook, PollHandle, ProductHook, ProductListHook, Refresh};
