//! Configuration for the catalog API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_flag, env_optional, server::ServerConfig};

pub use core_config::Environment;

/// Catalog-specific settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Bearer token required on every request; `None` leaves the API open
    pub api_key: Option<String>,
    /// Delay responses like a slow upstream catalog
    pub simulated_latency: bool,
}

impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_optional("CATALOG_API_KEY"),
            simulated_latency: env_flag("CATALOG_SIMULATED_LATENCY", true)?,
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            catalog: CatalogConfig::from_env()?,
        })
    }
}
