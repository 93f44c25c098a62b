use async_trait::async_trait;
use domain_catalog::InventoryRecord;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use super::outcome;
use super::polling::Refresh;
use super::state::{FetchState, Resource, Settled};
use crate::client::CatalogApi;

/// Inventory records for one product, or for every product when no id is
/// set.
pub struct InventoryHook<A: CatalogApi> {
    api: Arc<A>,
    product_id: Arc<Mutex<Option<String>>>,
    resource: Resource<Vec<InventoryRecord>>,
}

impl<A: CatalogApi> Clone for InventoryHook<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            product_id: Arc::clone(&self.product_id),
            resource: self.resource.clone(),
        }
    }
}

impl<A: CatalogApi> InventoryHook<A> {
    pub fn new(api: Arc<A>, product_id: Option<String>) -> Self {
        Self {
            api,
            product_id: Arc::new(Mutex::new(product_id)),
            resource: Resource::new(),
        }
    }

    pub async fn mounted(api: Arc<A>, product_id: Option<String>) -> Self {
        let hook = Self::new(api, product_id);
        hook.refetch().await;
        hook
    }

    fn lock_product_id(&self) -> MutexGuard<'_, Option<String>> {
        self.product_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn product_id(&self) -> Option<String> {
        self.lock_product_id().clone()
    }

    pub fn state(&self) -> FetchState<Vec<InventoryRecord>> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<InventoryRecord>>> {
        self.resource.subscribe()
    }

    pub fn inventory(&self) -> Vec<InventoryRecord> {
        self.state().data().cloned().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error().map(str::to_string)
    }

    pub async fn refetch(&self) -> Settled {
        let product_id = self.product_id();
        let api = Arc::clone(&self.api);

        self.resource
            .run(async move {
                outcome(
                    api.get_inventory(product_id.as_deref()).await,
                    "Failed to fetch inventory",
                    |response| response.data,
                )
            })
            .await
    }

    /// Switch product; fetches when the id changed.
    pub async fn set_product_id(&self, product_id: Option<String>) -> bool {
        {
            let mut current = self.lock_product_id();
            if *current == product_id {
                return false;
            }
            *current = product_id;
        }
        self.refetch().await;
        true
    }
}

#[async_trait]
impl<A: CatalogApi> Refresh for InventoryHook<A> {
    fn is_fetching(&self) -> bool {
        self.resource.is_fetching()
    }

    async fn refresh(&self) {
        self.refetch().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::fake::FakeApi;
    use domain_catalog::InventoryStatus;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_all_inventory_without_product() {
        let hook = InventoryHook::mounted(Arc::new(FakeApi::default()), None).await;
        assert_eq!(hook.inventory().len(), 3);
    }

    #[tokio::test]
    async fn test_inventory_for_product() {
        let api = Arc::new(FakeApi::default());
        let hook = InventoryHook::mounted(Arc::clone(&api), Some("1".into())).await;

        let records = hook.inventory();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status() == InventoryStatus::InStock));

        assert!(hook.set_product_id(Some("999".into())).await);
        assert!(hook.inventory().is_empty());
        assert_eq!(hook.error(), None);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_product_does_not_refetch() {
        let api = Arc::new(FakeApi::default());
        let hook = InventoryHook::mounted(Arc::clone(&api), Some("2".into())).await;

        assert!(!hook.set_product_id(Some("2".into())).await);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_uses_fallback_message() {
        let api = Arc::new(FakeApi::default());
        api.unsuccessful.store(true, Ordering::SeqCst);
        let hook = InventoryHook::mounted(api, None).await;

        assert_eq!(hook.error().as_deref(), Some("Failed to fetch inventory"));
    }
}
