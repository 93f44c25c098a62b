//! Catalog service - the layer handlers talk to

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{HealthStatus, InventoryRecord, Product};
use crate::query::{Page, ProductQuery};
use crate::repository::CatalogRepository;

/// Artificial per-endpoint response delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    pub list: Duration,
    pub product: Duration,
    pub inventory: Duration,
    pub health: Duration,
}

impl Latency {
    /// Respond immediately
    pub fn none() -> Self {
        Self::default()
    }

    /// Delays of a slow upstream catalog: 500/300/200/100 ms.
    pub fn simulated() -> Self {
        Self {
            list: Duration::from_millis(500),
            product: Duration::from_millis(300),
            inventory: Duration::from_millis(200),
            health: Duration::from_millis(100),
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    latency: Latency,
}

impl<R: CatalogRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            latency: self.latency,
        }
    }
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            latency: Latency::none(),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// List products matching `query`
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> CatalogResult<Page<Product>> {
        pause(self.latency.list).await;

        let page = self.repository.list_products(query).await?;
        debug!(
            returned = page.items.len(),
            total = page.pagination.total,
            "Listed products"
        );
        Ok(page)
    }

    /// Read a product without touching it
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> CatalogResult<Product> {
        pause(self.latency.product).await;

        self.repository
            .get_product(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Stamp a product as accessed and return the updated record
    #[instrument(skip(self))]
    pub async fn record_access(&self, id: &str) -> CatalogResult<Product> {
        self.repository
            .record_access(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Inventory records, for one product or all
    #[instrument(skip(self))]
    pub async fn list_inventory(
        &self,
        product_id: Option<String>,
    ) -> CatalogResult<Vec<InventoryRecord>> {
        pause(self.latency.inventory).await;
        self.repository.list_inventory(product_id).await
    }

    /// Liveness only; dependencies are not probed
    #[instrument(skip(self))]
    pub async fn health(&self) -> CatalogResult<HealthStatus> {
        pause(self.latency.health).await;
        Ok(HealthStatus::healthy())
    }
}
