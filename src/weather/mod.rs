use std::time::Instant;

use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::models::Coordinate;
use crate::{ForecastError, Result};

pub mod formatter;
pub mod open_meteo;

pub use formatter::format_forecast;

const SERVICE: &str = "forecast-api";

/// Fetches hourly forecasts. Returns the raw body; decoding happens in
/// [`format_forecast`].
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn forecast_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}/v1/forecast?latitude={:.6}&longitude={:.6}&hourly=temperature_2m",
            self.base_url, coordinate.latitude, coordinate.longitude
        )
    }

    #[instrument(skip(self), fields(lat = coordinate.latitude, lon = coordinate.longitude))]
    pub async fn fetch_forecast(&self, coordinate: Coordinate) -> Result<String> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.forecast_url(coordinate))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ForecastError::request(SERVICE, e))?;

        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::io(SERVICE, e))?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved forecast for {} ({} bytes) in {:.3}s",
            coordinate.format_coordinates(),
            body.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_forecast_url_uses_six_decimals() {
        let client = WeatherClient::new(Client::new(), "https://api.example.com");
        assert_eq!(
            client.forecast_url(Coordinate::new(52.52, 13.41)),
            "https://api.example.com/v1/forecast?latitude=52.520000&longitude=13.410000&hourly=temperature_2m"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_body() {
        let server = MockServer::start().await;
        let body = r#"{"hourly":{"time":[],"temperature_2m":[]}}"#;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "52.520000"))
            .and(query_param("hourly", "temperature_2m"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = WeatherClient::new(Client::new(), server.uri());
        let raw = client
            .fetch_forecast(Coordinate::new(52.52, 13.41))
            .await
            .unwrap();
        assert_eq!(raw, body);
    }

    #[tokio::test]
    async fn test_bad_status_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": true,
                "reason": "Latitude must be in range of -90 to 90°."
            })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(Client::new(), server.uri());
        let err = client
            .fetch_forecast(Coordinate::new(100.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Request { .. }), "got {err:?}");
        assert!(err.to_string().starts_with("error in request to forecast-api"));
    }

    /// Serves one response promising a longer body than it sends, then
    /// closes the connection.
    fn truncated_body_server() -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\n{\"hourly\":",
                )
                .unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_truncated_body_is_io_error() {
        let client = WeatherClient::new(Client::new(), truncated_body_server());
        let err = client
            .fetch_forecast(Coordinate::new(52.52, 13.41))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Io { .. }), "got {err:?}");
        assert!(err.to_string().starts_with("error reading the body from forecast-api"));
    }

    #[tokio::test]
    async fn test_timeout_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let http = Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap();
        let client = WeatherClient::new(http, server.uri());
        let err = client
            .fetch_forecast(Coordinate::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Request { .. }), "got {err:?}");
    }
}
