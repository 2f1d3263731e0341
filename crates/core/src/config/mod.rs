//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELF_*)
//! 2. TOML config file (if SHELF_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELF_*)
/// 2. TOML config file (if SHELF_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database.
    ///
    /// Set via SHELF_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// How long a cached search response stays fresh, in hours.
    ///
    /// Set via SHELF_CACHE_TTL_HOURS environment variable.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Base URL of the Open Library API.
    ///
    /// Set via SHELF_OPENLIBRARY_BASE_URL environment variable.
    #[serde(default = "default_openlibrary_base_url")]
    pub openlibrary_base_url: String,

    /// Base URL of the Open Library covers service.
    ///
    /// Set via SHELF_COVERS_BASE_URL environment variable.
    #[serde(default = "default_covers_base_url")]
    pub covers_base_url: String,

    /// User-Agent string for catalog requests.
    ///
    /// Set via SHELF_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Catalog request timeout in milliseconds.
    ///
    /// Set via SHELF_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Results per page when a search does not ask for a size.
    ///
    /// Set via SHELF_DEFAULT_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/shelf.sqlite")
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_openlibrary_base_url() -> String {
    "https://openlibrary.org".into()
}

fn default_covers_base_url() -> String {
    "https://covers.openlibrary.org/b".into()
}

fn default_user_agent() -> String {
    "shelf/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_page_size() -> u32 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_ttl_hours: default_cache_ttl_hours(),
            openlibrary_base_url: default_openlibrary_base_url(),
            covers_base_url: default_covers_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            default_page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Search cache TTL for `ShelfDb::cache_put`.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache_ttl_hours as i64)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SHELF_`
    /// 2. TOML file from `SHELF_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELF_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHELF_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
