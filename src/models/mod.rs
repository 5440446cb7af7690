//! Data models for the forecast service
//!
//! - Location: coordinates and the stored city record
//! - Forecast: display-ready forecast points for the views

pub mod forecast;
pub mod location;

// Re-export all public types for convenient access
pub use forecast::{ForecastPoint, WeatherDisplay};
pub use location::{CityRecord, Coordinate};
