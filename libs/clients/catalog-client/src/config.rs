use core_config::{ConfigError, FromEnv, env_optional};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_API_KEY: &str = "demo-key";

/// Where the catalog API lives and how to authenticate with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash
    pub base_url: String,
    /// Sent as `Authorization: Bearer <api_key>`
    pub api_key: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_KEY)
    }
}

impl FromEnv for ClientConfig {
    /// Reads `CATALOG_API_URL` and `CATALOG_API_KEY`; blank values fall
    /// back to the defaults.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            env_optional("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            env_optional("CATALOG_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
        ))
    }
}
