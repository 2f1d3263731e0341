//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest cache TTL accepted, in hours (30 days).
const MAX_CACHE_TTL_HOURS: u64 = 24 * 30;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_hours` is 0 or exceeds 30 days
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `default_page_size` is outside 1..=100
    /// - `user_agent` or either base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_hours == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_hours".into(),
                reason: format!("must not exceed {MAX_CACHE_TTL_HOURS} hours"),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if !(1..=100).contains(&self.default_page_size) {
            return Err(ConfigError::Invalid {
                field: "default_page_size".into(),
                reason: "must be between 1 and 100".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [
            ("openlibrary_base_url", &self.openlibrary_base_url),
            ("covers_base_url", &self.covers_base_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must not be empty".into() });
            }
        }

        if self.db_path.as_os_str().is_empty() {
            tracing::warn!("db_path is empty; SQLite will use a private temporary database");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ttl_zero() {
        let config = AppConfig { cache_ttl_hours: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_hours"));
    }

    #[test]
    fn test_validate_ttl_exceeds_limit() {
        let config = AppConfig { cache_ttl_hours: 24 * 30 + 1, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_hours"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_page_size() {
        for page_size in [0, 101] {
            let config = AppConfig { default_page_size: page_size, ..Default::default() };
            let result = config.validate();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "default_page_size"));
        }
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_empty_base_url() {
        let config = AppConfig { covers_base_url: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "covers_base_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { cache_ttl_hours: 1, timeout_ms: 100, default_page_size: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config =
            AppConfig { cache_ttl_hours: 24 * 30, timeout_ms: 300_000, default_page_size: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
