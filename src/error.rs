//! Error types and handling for the forecast service

use thiserror::Error;

/// Main error type for the forecast service
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Transport failures and unsuccessful HTTP statuses from upstream services
    #[error("error in request to {service}: {message}")]
    Request { service: String, message: String },

    /// Upstream body could not be decoded
    #[error("error decoding {service} response: {message}")]
    Decode { service: String, message: String },

    /// Geocoding returned no candidates
    #[error("no geocoding results for '{city}'")]
    NoResults { city: String },

    /// Upstream body could not be read
    #[error("error reading the body from {service}: {message}")]
    Io { service: String, message: String },

    /// Forecast payload could not be turned into display data
    #[error("error parsing forecast: {message}")]
    Parse { message: String },

    /// City store errors
    #[error("Store error: {message}")]
    Store { message: String },
}

impl ForecastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn request<S: Into<String>, M: ToString>(service: S, message: M) -> Self {
        Self::Request {
            service: service.into(),
            message: message.to_string(),
        }
    }

    pub fn decode<S: Into<String>, M: ToString>(service: S, message: M) -> Self {
        Self::Decode {
            service: service.into(),
            message: message.to_string(),
        }
    }

    pub fn no_results<S: Into<String>>(city: S) -> Self {
        Self::NoResults { city: city.into() }
    }

    pub fn io<S: Into<String>, M: ToString>(service: S, message: M) -> Self {
        Self::Io {
            service: service.into(),
            message: message.to_string(),
        }
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<M: ToString>(message: M) -> Self {
        Self::Store {
            message: message.to_string(),
        }
    }
}

impl From<sqlx::Error> for ForecastError {
    fn from(err: sqlx::Error) -> Self {
        Self::store(err)
    }
}

impl From<sqlx::migrate::MigrateError> for ForecastError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::store(format!("migration failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ForecastError::config("missing database url");
        assert!(matches!(config_err, ForecastError::Config { .. }));

        let validation_err = ForecastError::validation("empty city");
        assert!(matches!(validation_err, ForecastError::Validation { .. }));

        let parse_err = ForecastError::parse("bad timestamp");
        assert!(matches!(parse_err, ForecastError::Parse { .. }));
    }

    #[test]
    fn test_messages_name_the_failing_stage() {
        let err = ForecastError::request("geocoding-api", "connection refused");
        assert_eq!(
            err.to_string(),
            "error in request to geocoding-api: connection refused"
        );

        let err = ForecastError::decode("geocoding-api", "expected value");
        assert!(err.to_string().starts_with("error decoding geocoding-api"));

        let err = ForecastError::no_results("Atlantis");
        assert_eq!(err.to_string(), "no geocoding results for 'Atlantis'");

        let err = ForecastError::io("forecast-api", "unexpected eof");
        assert!(err.to_string().contains("reading the body"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: ForecastError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ForecastError::Store { .. }));
    }
}
