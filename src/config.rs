//! Configuration Module
//!
//! Handles loading the shell configuration from environment variables.

use std::env;
use std::time::Duration;

/// Shell configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache-wide TTL in milliseconds, also the sweep period
    pub cache_ttl_ms: u64,
    /// Root URL of the catalog API, with a trailing slash
    pub catalog_base_url: String,
    /// Deadline in seconds around each network fetch
    pub fetch_timeout_secs: u64,
    /// SQLite URL of the collection store
    pub database_url: String,
}

pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://pokeapi.co/api/v2/";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:pokedex.db";

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 60000)
    /// - `CATALOG_BASE_URL` - Catalog API root (default: https://pokeapi.co/api/v2/)
    /// - `FETCH_TIMEOUT_SECS` - Fetch deadline in seconds (default: 10)
    /// - `DATABASE_URL` - Collection store (default: sqlite:pokedex.db)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_CACHE_TTL_MS),
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| with_trailing_slash(v.trim()))
                .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string()),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            database_url: env::var("DATABASE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
