//! `OpenMeteo` forecast response structures

use serde::Deserialize;

/// Forecast response for `hourly=temperature_2m`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub hourly: HourlyData,
}

/// Parallel, index-aligned hourly series
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    /// Naive local timestamps, `YYYY-MM-DDTHH:MM`
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Vec<f64>,
}
