//! Turns a raw forecast payload into display rows.

use chrono::NaiveDateTime;

use super::open_meteo::ForecastResponse;
use crate::models::{ForecastPoint, WeatherDisplay};
use crate::{ForecastError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%a %H:%M";

/// Decodes `raw` and formats every hourly entry. Fails as a whole on the
/// first bad entry; no partial display is ever returned.
pub fn format_forecast(city: &str, raw: &str) -> Result<WeatherDisplay> {
    let response: ForecastResponse = serde_json::from_str(raw)
        .map_err(|e| ForecastError::parse(format!("error decoding weather response: {e}")))?;

    let hourly = response.hourly;
    if hourly.time.len() != hourly.temperature.len() {
        return Err(ForecastError::parse(format!(
            "{} timestamps but {} temperatures",
            hourly.time.len(),
            hourly.temperature.len()
        )));
    }

    let forecasts = hourly
        .time
        .iter()
        .zip(&hourly.temperature)
        .map(|(time, temperature)| {
            let date = NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT).map_err(|e| {
                ForecastError::parse(format!("error parsing time '{time}': {e}"))
            })?;
            Ok(ForecastPoint {
                date: date.format(DISPLAY_FORMAT).to_string(),
                temperature: format_temperature(*temperature),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Formatted {} forecast points for {} ({})",
        forecasts.len(),
        city,
        response.timezone
    );

    Ok(WeatherDisplay {
        city: city.to_string(),
        forecasts,
    })
}

/// Format temperature with unit
#[must_use]
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}
