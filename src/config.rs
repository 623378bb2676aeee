//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Default PokeAPI base URL
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Retry configuration
    pub retry: RetryConfig,
}

/// Catalog service configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (no trailing slash)
    pub base_url: String,
    /// Per-request timeout (in seconds)
    pub request_timeout_secs: u64,
}

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry (in milliseconds), doubled after each failure
    pub initial_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: 30,
            },
            retry: RetryConfig {
                initial_delay_ms: 1000,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog: CatalogConfig {
                base_url: env::var("POKEDEX_API_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.catalog.base_url),
                request_timeout_secs: env::var("POKEDEX_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.catalog.request_timeout_secs),
            },
            retry: RetryConfig {
                initial_delay_ms: env::var("POKEDEX_RETRY_INITIAL_DELAY_MS")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(defaults.retry.initial_delay_ms),
            },
        }
    }

    /// Override the catalog base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.catalog.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the initial retry delay
    pub fn with_initial_delay_ms(mut self, initial_delay_ms: u64) -> Self {
        self.retry.initial_delay_ms = initial_delay_ms;
        self
    }

    /// Per-request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.request_timeout_secs)
    }

    /// Initial retry delay as a `Duration`
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry.initial_delay_ms)
    }
}
