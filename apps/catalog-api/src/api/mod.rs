//! API routes module

use axum::{Router, middleware};
use axum_helpers::{create_permissive_cors_layer, require_bearer_token};
use domain_catalog::handlers;

use crate::state::AppState;

/// Catalog routes behind the optional bearer check
pub fn routes(state: &AppState) -> Router {
    let router = handlers::router(state.catalog.clone()).layer(middleware::from_fn_with_state(
        state.bearer_token(),
        require_bearer_token,
    ));

    if state.config.environment.is_development() {
        router.layer(create_permissive_cors_layer())
    } else {
        router
    }
}
