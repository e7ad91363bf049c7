//! Configuration management for downwatch
//!
//! Layered configuration loaded from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Settings can be overridden using the pattern
//! `DOWNWATCH__<section>__<key>`, for example:
//! - `DOWNWATCH__BACKEND__BASE_URL=http://backend:9000`
//! - `DOWNWATCH__SESSION__HEALTH_POLL_SECS=10`
//!
//! # Configuration File
//!
//! By default the configuration is read from `config/downwatch.toml`;
//! override the path with the `DOWNWATCH_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{BackendConfig, Config, LimitsConfig, SessionConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[backend]
base_url = "http://localhost:3000"
user_agent = "downwatch-test"
trace_header = "x-trace-id"
request_id_header = "x-request-id"

[session]
health_poll_secs = 30
render_interval_ms = 250

[limits]
latency_window = 100
event_log_capacity = 50
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.backend.user_agent, "downwatch-test");
        assert_eq!(config.session.render_interval_ms, 250);
        assert_eq!(config.limits.event_log_capacity, 50);
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[backend]\nbase_url = \"backend:9000\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(ValidationError::InvalidBaseUrl(_)))
        ));
    }
}
