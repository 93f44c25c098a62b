//! Catalog Domain
//!
//! Products and per-location inventory served from an in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Latency, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, envelope, query
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{CatalogService, InMemoryCatalogRepository, Latency, handlers};
//!
//! let (repository, report) = InMemoryCatalogRepository::seeded();
//! assert!(!report.is_clean());
//!
//! let service = CatalogService::new(repository).with_latency(Latency::simulated());
//! let router = handlers::router(service);
//! ```

pub mod display;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod seed;
pub mod service;

// Re-export commonly used types
pub use display::StockBadge;
pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{
    ApiResponse, HealthStatus, InventoryRecord, InventoryStatus, Pagination, Product,
};
pub use query::{Catalogued, Page, ProductQuery, SortField, SortOrder, SortPreset};
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use seed::{SeedDiscrepancy, SeedReport};
pub use service::{CatalogService, Latency};
