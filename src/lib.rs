//! `CityForecast` - hourly temperature forecasts for a city name
//!
//! Geocodes city names through a read-through cache backed by SQLite, fetches
//! the hourly forecast from Open-Meteo and renders it as HTML.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod models;
pub mod views;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::{CityStore, SqliteCityStore};
pub use config::ForecastConfig;
pub use error::ForecastError;
pub use geocoding::{Geocoder, OpenMeteoGeocoder};
pub use location_resolver::CoordinateResolver;
pub use models::{CityRecord, Coordinate, ForecastPoint, WeatherDisplay};
pub use weather::{WeatherClient, format_forecast};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ForecastError>;
