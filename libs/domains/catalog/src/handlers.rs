//! HTTP handlers for the catalog API

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    routing::get,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    ApiResponse, HealthStatus, InventoryRecord, InventoryStatus, Pagination, Product,
};
use crate::query::{ProductQuery, SortOrder};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product, list_inventory, get_inventory, health),
    components(
        schemas(
            Product, InventoryRecord, InventoryStatus, Pagination, HealthStatus,
            ProductQuery, SortOrder
        ),
        responses(
            BadRequestResponse, NotFoundResponse, UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog"),
        (name = "Inventory", description = "Stock levels per location"),
        (name = "Health", description = "Service liveness")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CatalogService<R>>;

/// Create the catalog router with all HTTP endpoints
pub fn router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/inventory", get(list_inventory))
        .route("/inventory/{product_id}", get(get_inventory))
        .route("/health", get(health))
        .with_state(shared_service)
}

/// Listing parameters read from the raw query string.
///
/// Repeated keys keep their first value instead of rejecting the request.
impl<S: Send + Sync> FromRequestParts<S> for ProductQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ProductQuery::from_pairs(pairs))
    }
}

/// List products with filtering, sorting and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    query: ProductQuery,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let page = service
        .list_products(query)
        .await
        .map_err(|e| e.into_app_error("Failed to fetch products"))?;

    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

/// Get a product by id, recording the access
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let context = "Failed to fetch product";
    service
        .get_product(&id)
        .await
        .map_err(|e| e.into_app_error(context))?;
    let product = service
        .record_access(&id)
        .await
        .map_err(|e| e.into_app_error(context))?;

    Ok(Json(ApiResponse::ok(product)))
}

/// List inventory across all products
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "Inventory",
    responses(
        (status = 200, description = "All inventory records", body = ApiResponse<Vec<InventoryRecord>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_inventory<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
) -> Result<Json<ApiResponse<Vec<InventoryRecord>>>, AppError> {
    let records = service
        .list_inventory(None)
        .await
        .map_err(|e| e.into_app_error("Failed to fetch inventory"))?;

    Ok(Json(ApiResponse::ok(records)))
}

/// List inventory for one product. Unknown products yield an empty list.
#[utoipa::path(
    get,
    path = "/inventory/{product_id}",
    tag = "Inventory",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Inventory records for the product", body = ApiResponse<Vec<InventoryRecord>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_inventory<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Path(product_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<InventoryRecord>>>, AppError> {
    let records = service
        .list_inventory(Some(product_id))
        .await
        .map_err(|e| e.into_app_error("Failed to fetch inventory"))?;

    Ok(Json(ApiResponse::ok(records)))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse<HealthStatus>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn health<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
) -> Result<Json<ApiResponse<HealthStatus>>, AppError> {
    let status = service
        .health()
        .await
        .map_err(|e| e.into_app_error("Health check failed"))?;

    Ok(Json(ApiResponse::ok(status)))
}
