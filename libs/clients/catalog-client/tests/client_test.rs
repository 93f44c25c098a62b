//! Client tests against a real catalog server
//!
//! Each test serves the catalog router on an ephemeral port, the same way
//! the API binary assembles it, and talks to it over HTTP.

use axum::middleware;
use axum_helpers::{BearerToken, ShutdownCoordinator, create_router, require_bearer_token};
use catalog_client::hooks::{InventoryHook, ProductHook, ProductListHook};
use catalog_client::{CatalogApi, CatalogClient, ClientConfig, ClientError};
use domain_catalog::{
    ApiDoc, CatalogService, InMemoryCatalogRepository, ProductQuery, SortOrder, handlers,
};
use std::sync::Arc;
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

struct TestServer {
    base_url: String,
    coordinator: ShutdownCoordinator,
}

impl TestServer {
    async fn start(token: BearerToken) -> Self {
        let (repository, _) = InMemoryCatalogRepository::seeded();
        let routes = handlers::router(CatalogService::new(repository))
            .layer(middleware::from_fn_with_state(token, require_bearer_token));
        let router = create_router::<ApiDoc>(routes);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (coordinator, _rx) = ShutdownCoordinator::new();
        tokio::spawn(axum_helpers::serve_with_shutdown(
            listener,
            router,
            coordinator.clone(),
        ));

        Self {
            base_url: format!("http://{addr}/api"),
            coordinator,
        }
    }

    fn client(&self, api_key: &str) -> CatalogClient {
        CatalogClient::new(ClientConfig::new(&self.base_url, api_key))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.coordinator.shutdown();
    }
}

#[tokio::test]
async fn test_list_products_round_trip() {
    let server = TestServer::start(BearerToken::new(Some(API_KEY.into()))).await;
    let client = server.client(API_KEY);

    let query = ProductQuery::default()
        .category("Medical Devices")
        .sort("price", SortOrder::Desc)
        .limit(1);
    let response = client.get_products(&query).await.unwrap();

    assert!(response.success);
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].name, "Digital Blood Pressure Monitor");
    assert_eq!(response.data[0].price, 89.99);
    let pagination = response.pagination.unwrap();
    assert_eq!((pagination.page, pagination.limit, pagination.total), (1, 1, 1));
}

#[tokio::test]
async fn test_search_with_special_characters() {
    let server = TestServer::start(BearerToken::disabled()).await;
    let client = server.client("anything");

    let response = client
        .get_products(&ProductQuery::default().search("amox & co"))
        .await
        .unwrap();
    assert!(response.data.is_empty());

    let response = client
        .get_products(&ProductQuery::default().search("Amox"))
        .await
        .unwrap();
    assert_eq!(response.data.len(), 1);
}

#[tokio::test]
async fn test_get_product_not_found_keeps_status() {
    let server = TestServer::start(BearerToken::disabled()).await;
    let err = server.client(API_KEY).get_product("999").await.unwrap_err();

    assert_eq!(err.to_string(), "Product not found");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let server = TestServer::start(BearerToken::new(Some(API_KEY.into()))).await;
    let err = server.client("demo-key").health_check().await.unwrap_err();

    match err {
        ClientError::Api { status, message, .. } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid or missing bearer token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_inventory_endpoints() {
    let server = TestServer::start(BearerToken::disabled()).await;
    let client = server.client(API_KEY);

    assert_eq!(client.get_inventory(None).await.unwrap().data.len(), 3);
    assert_eq!(client.get_inventory(Some("1")).await.unwrap().data.len(), 2);
    assert!(client.get_inventory(Some("999")).await.unwrap().data.is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CatalogClient::new(ClientConfig::new(format!("http://{addr}/api"), API_KEY));
    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_hooks_over_http() {
    let server = TestServer::start(BearerToken::new(Some(API_KEY.into()))).await;
    let client = Arc::new(server.client(API_KEY));

    let list = ProductListHook::mounted(Arc::clone(&client), ProductQuery::default().limit(1)).await;
    assert!(list.has_more());
    assert!(list.next_page().await);
    assert_eq!(list.products()[0].id, "2");

    let product = ProductHook::mounted(Arc::clone(&client), "1").await;
    let first = product.product().unwrap().last_updated;
    product.refetch().await;
    assert!(product.product().unwrap().last_updated > first);

    let inventory = InventoryHook::mounted(client, Some("2".into())).await;
    assert_eq!(inventory.inventory().len(), 1);
}
