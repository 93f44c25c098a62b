//! Client-side state containers over the catalog API.
//!
//! Each hook is a cheap cloneable handle. It owns a [`Resource`] whose
//! [`FetchState`] can be read with `state()` or watched with `subscribe()`,
//! re-fetches when its input changes, and can be refreshed on a timer with
//! [`Refresh::poll`].
//!
//! ```rust,no_run
//! use catalog_client::{CatalogClient, ClientConfig};
//! use catalog_client::hooks::{LIST_REFRESH_INTERVAL, ProductListHook, Refresh};
//! use domain_catalog::ProductQuery;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let client = Arc::new(CatalogClient::new(ClientConfig::default()));
//! let products = ProductListHook::mounted(client, ProductQuery::default()).await;
//! let _polling = products.poll(LIST_REFRESH_INTERVAL);
//!
//! for product in products.products() {
//!     println!("{} - {}", product.name, product.price);
//! }
//! # }
//! ```

pub mod inventory;
pub mod polling;
pub mod product;
pub mod products;
pub mod state;

pub use inventory::InventoryHook;
pub use polling::{PollHandle, Refresh};
pub use product::ProductHook;
pub use products::{ProductListHook, ProductPage};
pub use state::{FetchState, Resource, Settled};

use domain_catalog::ApiResponse;
use std::time::Duration;

use crate::error::ClientResult;

/// Refresh period for list views
pub const LIST_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Refresh period for the product detail view
pub const DETAIL_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Reduce a client result to the value a hook stores, or its display string.
///
/// An envelope with `success: false` fails with its `message`, or with
/// `fallback` when it has none.
fn outcome<T, U>(
    result: ClientResult<ApiResponse<T>>,
    fallback: &str,
    map: impl FnOnce(ApiResponse<T>) -> U,
) -> Result<U, String> {
    match result {
        Ok(response) if response.success => Ok(map(response)),
        Ok(response) => Err(response.message.unwrap_or_else(|| fallback.to_string())),
        Err(err) => Err(err.to_string()),
    }
}
