//! Catalog API - mock medical supplies catalog over REST

use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::InMemoryCatalogRepository;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let (repository, report) = InMemoryCatalogRepository::seeded();
    if !report.is_clean() {
        warn!(
            discrepancies = report.discrepancies.len(),
            "Seed data had inconsistent stock labels; derived values were used"
        );
    }

    if config.catalog.simulated_latency {
        info!("Simulated latency enabled");
    }

    let state = AppState::new(config, repository);
    if !state.bearer_token().is_enabled() {
        warn!("CATALOG_API_KEY is not set; the API accepts unauthenticated requests");
    }

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        std::future::ready(()),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
