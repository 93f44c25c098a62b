//! HTTP client for the catalog API

use async_trait::async_trait;
use axum_helpers::ErrorResponse;
use domain_catalog::{ApiResponse, HealthStatus, InventoryRecord, Product, ProductQuery};
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Read operations the data hooks depend on.
#[async_trait]
pub trait CatalogApi: Send + Sync + 'static {
    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ApiResponse<Vec<Product>>>;

    async fn get_product(&self, id: &str) -> ClientResult<ApiResponse<Product>>;

    /// Inventory for one product, or all inventory when `product_id` is `None`
    async fn get_inventory(
        &self,
        product_id: Option<&str>,
    ) -> ClientResult<ApiResponse<Vec<InventoryRecord>>>;

    async fn health_check(&self) -> ClientResult<ApiResponse<HealthStatus>>;
}

/// Catalog API client over `reqwest`
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: ClientConfig,
}

impl CatalogClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<ApiResponse<T>> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!(%url, "Catalog API request");

        self.send(&url).await.inspect_err(|err| {
            error!(endpoint, error = %err, "API request failed");
        })
    }

    async fn send<T: DeserializeOwned>(&self, url: &str) -> ClientResult<ApiResponse<T>> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build the error for a non-success response. Falls back to `HTTP <status>`
/// when the body is not an error document.
fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let parsed = serde_json::from_slice::<ErrorResponse>(body).ok();
    let details = parsed.as_ref().and_then(|e| e.details.clone());
    let message = parsed
        .map(|e| e.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    ClientError::Api {
        status: status.as_u16(),
        message,
        details,
    }
}

/// `/products` plus a query string of the parameters that are set.
///
/// Blank `category`/`search` are left out; the paging and sort parameters
/// are always sent.
pub fn products_endpoint(query: &ProductQuery) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(category) = query.category_filter() {
        params.push(("category", category.to_string()));
    }
    if let Some(search) = query.search_term() {
        params.push(("search", search.to_string()));
    }
    params.push(("page", query.page.to_string()));
    params.push(("limit", query.limit.to_string()));
    params.push(("sortBy", query.sort_by.clone()));
    params.push(("sortOrder", query.sort_order.to_string()));

    let query_string = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("/products?{query_string}")
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn get_products(&self, query: &ProductQuery) -> ClientResult<ApiResponse<Vec<Product>>> {
        self.request(&products_endpoint(query)).await
    }

    async fn get_product(&self, id: &str) -> ClientResult<ApiResponse<Product>> {
        self.request(&format!("/products/{}", urlencoding::encode(id)))
            .await
    }

    async fn get_inventory(
        &self,
        product_id: Option<&str>,
    ) -> ClientResult<ApiResponse<Vec<InventoryRecord>>> {
        let endpoint = match product_id {
            Some(id) => format!("/inventory/{}", urlencoding::encode(id)),
            None => "/inventory".to_string(),
        };
        self.request(&endpoint).await
    }

    async fn health_check(&self) -> ClientResult<ApiResponse<HealthStatus>> {
        self.request("/health").await
    }
}
