use async_trait::async_trait;
use domain_catalog::Product;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use super::outcome;
use super::polling::Refresh;
use super::state::{FetchState, Resource, Settled};
use crate::client::CatalogApi;

/// A single product, fetched by id.
///
/// An empty id means "no product selected": nothing is fetched and the state
/// is left as it was.
pub struct ProductHook<A: CatalogApi> {
    api: Arc<A>,
    id: Arc<Mutex<String>>,
    resource: Resource<Product>,
}

impl<A: CatalogApi> Clone for ProductHook<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            id: Arc::clone(&self.id),
            resource: self.resource.clone(),
        }
    }
}

impl<A: CatalogApi> ProductHook<A> {
    pub fn new(api: Arc<A>, id: impl Into<String>) -> Self {
        Self {
            api,
            id: Arc::new(Mutex::new(id.into())),
            resource: Resource::new(),
        }
    }

    pub async fn mounted(api: Arc<A>, id: impl Into<String>) -> Self {
        let hook = Self::new(api, id);
        hook.refetch().await;
        hook
    }

    fn lock_id(&self) -> MutexGuard<'_, String> {
        self.id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> String {
        self.lock_id().clone()
    }

    pub fn state(&self) -> FetchState<Product> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<Product>> {
        self.resource.subscribe()
    }

    pub fn product(&self) -> Option<Product> {
        self.state().data().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error().map(str::to_string)
    }

    /// Fetch the current id again. `None` when the id is empty.
    pub async fn refetch(&self) -> Option<Settled> {
        let id = self.id();
        if id.is_empty() {
            return None;
        }
        let api = Arc::clone(&self.api);

        let settled = self
            .resource
            .run(async move {
                outcome(
                    api.get_product(&id).await,
                    "Failed to fetch product",
                    |response| response.data,
                )
            })
            .await;
        Some(settled)
    }

    /// Switch to another product; fetches when the id changed and is not empty.
    pub async fn set_id(&self, id: impl Into<String>) -> bool {
        let id = id.into();
        {
            let mut current = self.lock_id();
            if *current == id {
                return false;
            }
            *current = id;
        }
        self.refetch().await.is_some()
    }
}

#[async_trait]
impl<A: CatalogApi> Refresh for ProductHook<A> {
    fn is_fetching(&self) -> bool {
        self.resource.is_fetching()
    }

    async fn refresh(&self) {
        self.refetch().await;
    }
}
