//! Application state management

use axum_helpers::BearerToken;
use domain_catalog::{CatalogService, InMemoryCatalogRepository, Latency};

use crate::config::Config;

pub type Catalog = CatalogService<InMemoryCatalogRepository>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Config, repository: InMemoryCatalogRepository) -> Self {
        let latency = if config.catalog.simulated_latency {
            Latency::simulated()
        } else {
            Latency::none()
        };

        Self {
            catalog: CatalogService::new(repository).with_latency(latency),
            config,
        }
    }

    /// Token the API requires; disabled when no key is configured
    pub fn bearer_token(&self) -> BearerToken {
        BearerToken::new(self.config.catalog.api_key.clone())
    }
}
