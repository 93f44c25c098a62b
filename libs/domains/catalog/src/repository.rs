use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CatalogResult;
use crate::models::{InventoryRecord, Product};
use crate::query::{self, Page, ProductQuery};
use crate::seed::{self, SeedReport};

/// Data access for products and inventory.
///
/// Reads never mutate. The only write is [`record_access`], which stamps
/// `last_updated` on a product.
///
/// [`record_access`]: CatalogRepository::record_access
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Filter, sort and paginate products
    async fn list_products(&self, query: ProductQuery) -> CatalogResult<Page<Product>>;

    /// Get a product by id
    async fn get_product(&self, id: &str) -> CatalogResult<Option<Product>>;

    /// Stamp a product as accessed now and return the updated record
    async fn record_access(&self, id: &str) -> CatalogResult<Option<Product>>;

    /// Inventory for one product, or every record when `product_id` is `None`
    async fn list_inventory(&self, product_id: Option<String>)
    -> CatalogResult<Vec<InventoryRecord>>;
}

/// In-process store. Cloning shares the underlying records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogRepository {
    products: Arc<RwLock<Vec<Product>>>,
    inventory: Arc<RwLock<Vec<InventoryRecord>>>,
}

impl InMemoryCatalogRepository {
    pub fn new(products: Vec<Product>, inventory: Vec<InventoryRecord>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
            inventory: Arc::new(RwLock::new(inventory)),
        }
    }

    /// Store loaded with the sample data set.
    pub fn seeded() -> (Self, SeedReport) {
        let (products, inventory, report) = seed::load();
        (Self::new(products, inventory), report)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_products(&self, query: ProductQuery) -> CatalogResult<Page<Product>> {
        let products = self.products.read().await;
        Ok(query::select(products.iter(), &query))
    }

    async fn get_product(&self, id: &str) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn record_access(&self, id: &str) -> CatalogResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.touch(Utc::now());
            product.clone()
        }))
    }

    async fn list_inventory(
        &self,
        product_id: Option<String>,
    ) -> CatalogResult<Vec<InventoryRecord>> {
        let inventory = self.inventory.read().await;
        Ok(inventory
            .iter()
            .filter(|r| product_id.as_deref().is_none_or(|id| r.product_id == id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;

    fn repo() -> InMemoryCatalogRepository {
        InMemoryCatalogRepository::seeded().0
    }

    #[tokio::test]
    async fn test_get_product_does_not_touch() {
        let repo = repo();
        let first = repo.get_product("1").await.unwrap().unwrap();
        let second = repo.get_product("1").await.unwrap().unwrap();
        assert_eq!(first.last_updated, second.last_updated);
    }

    #[tokio::test]
    async fn test_record_access_advances_last_updated() {
        let repo = repo();
        let before = repo.get_product("1").await.unwrap().unwrap();
        let first = repo.record_access("1").await.unwrap().unwrap();
        let second = repo.record_access("1").await.unwrap().unwrap();

        assert!(first.last_updated > before.last_updated);
        assert!(second.last_updated > first.last_updated);

        let stored = repo.get_product("1").await.unwrap().unwrap();
        assert_eq!(stored.last_updated, second.last_updated);
    }

    #[tokio::test]
    async fn test_record_access_unknown_id() {
        assert!(repo().record_access("999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_touches_serialize() {
        let repo = repo();
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.record_access("2").await.unwrap().unwrap() })
            })
            .collect();

        let mut stamps = Vec::new();
        for handle in handles {
            stamps.push(handle.await.unwrap().last_updated);
        }
        stamps.sort();
        stamps.dedup();
        assert_eq!(stamps.len(), 16);
    }

    #[tokio::test]
    async fn test_list_inventory_by_product() {
        let repo = repo();
        assert_eq!(repo.list_inventory(Some("1".into())).await.unwrap().len(), 2);
        assert_eq!(repo.list_inventory(Some("2".into())).await.unwrap().len(), 1);
        assert!(repo.list_inventory(Some("999".into())).await.unwrap().is_empty());
        assert_eq!(repo.list_inventory(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_products_uses_query() {
        let query = ProductQuery::default()
            .category("medical devices")
            .sort("price", SortOrder::Desc);
        let page = repo().list_products(query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Digital Blood Pressure Monitor");
        assert_eq!(page.pagination.total, 1);
    }
}
