//! Configuration management for the forecast service
//!
//! Settings come from serde defaults, then `FORECAST_*` environment
//! variables, then `DATABASE_URL`, which is required.

use crate::ForecastError;
use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

const ENV_PREFIX: &str = "FORECAST";
const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Root configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// sqlx connection string for the city store
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Base URL of the forecast API
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Total timeout for one outbound request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Basic auth credentials guarding `/stats`
    #[serde(default = "default_stats_credential")]
    pub stats_username: String,
    #[serde(default = "default_stats_credential")]
    pub stats_password: String,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_database_max_connections() -> u32 {
    5
}

fn default_port() -> u16 {
    8080
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_stats_credential() -> String {
    "forecast".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            database_max_connections: default_database_max_connections(),
            port: default_port(),
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            stats_username: default_stats_credential(),
            stats_password: default_stats_credential(),
            log_level: default_log_level(),
        }
    }
}

impl ForecastConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment when `vars` is given.
    pub fn load_from(vars: Option<HashMap<String, String>>) -> Result<Self> {
        let database_url = match &vars {
            Some(vars) => vars.get(DATABASE_URL_VAR).cloned(),
            None => env::var(DATABASE_URL_VAR).ok(),
        };

        let settings = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(vars),
            )
            .set_override_option("database_url", database_url)
            .with_context(|| "Failed to apply DATABASE_URL")?
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ForecastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to fields that were set but left empty
    pub fn apply_defaults(&mut self) {
        if self.geocoding_url.is_empty() {
            self.geocoding_url = default_geocoding_url();
        }
        if self.forecast_url.is_empty() {
            self.forecast_url = default_forecast_url();
        }
        if self.database_max_connections == 0 {
            self.database_max_connections = default_database_max_connections();
        }
        if self.log_level.is_empty() {
            self.log_level = default_log_level();
        }
        // Base URLs are joined with absolute paths
        self.geocoding_url = self.geocoding_url.trim_end_matches('/').to_string();
        self.forecast_url = self.forecast_url.trim_end_matches('/').to_string();
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(ForecastError::config(format!(
                "{DATABASE_URL_VAR} must be set to the city store connection string"
            ))
            .into());
        }

        for (name, url) in [
            ("geocoding", &self.geocoding_url),
            ("forecast", &self.forecast_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ForecastError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if !(1..=300).contains(&self.request_timeout_seconds) {
            return Err(
                ForecastError::config("Request timeout must be between 1 and 300 seconds").into(),
            );
        }

        if !(1..=300).contains(&self.connect_timeout_seconds) {
            return Err(
                ForecastError::config("Connect timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.stats_username.is_empty() || self.stats_username.contains(':') {
            return Err(ForecastError::config(
                "Stats username must be non-empty and must not contain ':'",
            )
            .into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.geocoding_url, "https://geocoding-api.open-meteo.com");
        assert_eq!(config.forecast_url, "https://api.open-meteo.com");
        assert_eq!(config.stats_username, "forecast");
        assert_eq!(config.stats_password, "forecast");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_database_url_is_rejected() {
        let result = ForecastConfig::load_from(vars(&[]));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_load_from_variables() {
        let config = ForecastConfig::load_from(vars(&[
            ("DATABASE_URL", "sqlite://cities.db"),
            ("FORECAST_PORT", "9000"),
            ("FORECAST_GEOCODING_URL", "http://localhost:1234/"),
            ("FORECAST_REQUEST_TIMEOUT_SECONDS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite://cities.db");
        assert_eq!(config.port, 9000);
        assert_eq!(config.geocoding_url, "http://localhost:1234");
        assert_eq!(config.request_timeout_seconds, 3);
        assert_eq!(config.forecast_url, "https://api.open-meteo.com");
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ForecastConfig::default();
        config.database_url = "sqlite::memory:".to_string();
        config.log_level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = ForecastConfig::default();
        config.database_url = "sqlite::memory:".to_string();
        config.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Request timeout"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = ForecastConfig::default();
        config.database_url = "sqlite::memory:".to_string();
        config.forecast_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
