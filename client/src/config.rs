//! Backend endpoint configuration.
//!
//! One setting exists: the base URL of the inventory service, resolved from
//! the environment at process start. Tests construct `Config` directly and
//! point it at a mock server on a random port.

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "INVENTORY_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
}

impl Config {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL from `INVENTORY_API_URL`, falling back to the
    /// local development default when unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(&url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
