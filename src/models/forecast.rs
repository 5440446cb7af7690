//! Display-ready forecast model

use serde::Serialize;

/// One hourly row of the forecast page
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ForecastPoint {
    /// Local time, e.g. `Mon 13:00`
    pub date: String,
    /// Temperature label, e.g. `21.1°C`
    pub temperature: String,
}

/// Everything the weather view needs for one city
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WeatherDisplay {
    pub city: String,
    /// Chronological, in the order the forecast service returned them
    pub forecasts: Vec<ForecastPoint>,
}
