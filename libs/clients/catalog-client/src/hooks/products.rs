use async_trait::async_trait;
use domain_catalog::{Pagination, Product, ProductQuery, SortPreset};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use super::outcome;
use super::polling::Refresh;
use super::state::{FetchState, Resource, Settled};
use crate::client::CatalogApi;

/// One page of the product listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Option<Pagination>,
}

impl ProductPage {
    /// Whether a later page exists
    pub fn has_more(&self) -> bool {
        self.pagination
            .is_some_and(|p| (p.page as usize) < p.total_pages)
    }
}

/// Paged, filtered product listing that re-fetches when its query changes.
pub struct ProductListHook<A: CatalogApi> {
    api: Arc<A>,
    query: Arc<Mutex<ProductQuery>>,
    resource: Resource<ProductPage>,
}

impl<A: CatalogApi> Clone for ProductListHook<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            query: Arc::clone(&self.query),
            resource: self.resource.clone(),
        }
    }
}

impl<A: CatalogApi> ProductListHook<A> {
    /// Hook in the idle state; nothing is fetched until asked.
    pub fn new(api: Arc<A>, query: ProductQuery) -> Self {
        Self {
            api,
            query: Arc::new(Mutex::new(query)),
            resource: Resource::new(),
        }
    }

    /// Hook with its first fetch already settled
    pub async fn mounted(api: Arc<A>, query: ProductQuery) -> Self {
        let hook = Self::new(api, query);
        hook.refetch().await;
        hook
    }

    fn lock_query(&self) -> MutexGuard<'_, ProductQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn query(&self) -> ProductQuery {
        self.lock_query().clone()
    }

    pub fn state(&self) -> FetchState<ProductPage> {
        self.resource.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<ProductPage>> {
        self.resource.subscribe()
    }

    /// Products of the current page; during a reload, the previous page's
    pub fn products(&self) -> Vec<Product> {
        self.state()
            .data()
            .map(|page| page.products.clone())
            .unwrap_or_default()
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.state().data().and_then(|page| page.pagination)
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error().map(str::to_string)
    }

    pub fn has_more(&self) -> bool {
        self.state().data().is_some_and(ProductPage::has_more)
    }

    /// Fetch the current query again
    pub async fn refetch(&self) -> Settled {
        let query = self.query();
        let api = Arc::clone(&self.api);

        self.resource
            .run(async move {
                outcome(
                    api.get_products(&query).await,
                    "Failed to fetch products",
                    |response| ProductPage {
                        products: response.data,
                        pagination: response.pagination,
                    },
                )
            })
            .await
    }

    /// Replace the query. Fetches only when the new query differs by value;
    /// returns whether a fetch was issued.
    pub async fn set_query(&self, query: ProductQuery) -> bool {
        {
            let mut current = self.lock_query();
            if *current == query {
                return false;
            }
            *current = query;
        }
        self.refetch().await;
        true
    }

    /// Apply `change` to a copy of the query, back on page 1
    async fn refine(&self, change: impl FnOnce(&mut ProductQuery)) -> bool {
        let mut query = self.query();
        change(&mut query);
        query.page = 1;
        self.set_query(query).await
    }

    pub async fn set_category(&self, category: Option<String>) -> bool {
        self.refine(|q| q.category = category).await
    }

    pub async fn set_search(&self, search: Option<String>) -> bool {
        self.refine(|q| q.search = search).await
    }

    pub async fn set_sort(&self, preset: SortPreset) -> bool {
        self.refine(|q| {
            q.sort_by = preset.field().to_string();
            q.sort_order = preset.order();
        })
        .await
    }

    /// Advance one page when a later page exists and nothing is loading.
    pub async fn next_page(&self) -> bool {
        if !self.has_more() || self.is_loading() {
            return false;
        }
        let mut query = self.query();
        query.page += 1;
        self.set_query(query).await
    }
}

#[async_trait]
impl<A: CatalogApi> Refresh for ProductListHook<A> {
    fn is_fetching(&self) -> bool {
        self.resource.is_fetching()
    }

    async fn refresh(&self) {
        self.refetch().await;
    }
}
