//! Geocoding client for the Open-Meteo search API
//!
//! Resolves a city name to candidate coordinates, ranked by the service's own
//! relevance ordering.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::models::Coordinate;
use crate::{ForecastError, Result};

const SERVICE: &str = "geocoding-api";
const MAX_CANDIDATES: u8 = 10;

/// Turns a place name into candidate coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates in relevance order. An empty list is not an error here.
    async fn search(&self, name: &str) -> Result<Vec<Coordinate>>;
}

pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/v1/search?name={}&count={}&language=en&format=json",
            self.base_url,
            urlencoding::encode(name),
            MAX_CANDIDATES
        )
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn search(&self, name: &str) -> Result<Vec<Coordinate>> {
        info!("Geocoding location: '{}'", name);
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.search_url(name))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ForecastError::request(SERVICE, e))?;

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::decode(SERVICE, e))?;

        let candidates: Vec<Coordinate> = body.results.into_iter().map(Into::into).collect();

        if candidates.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            info!(
                "Found {} geocoding results for '{}' in {:.3}s",
                candidates.len(),
                name,
                start_time.elapsed().as_secs_f64()
            );
            debug!(
                "Geocoding results: {:?}",
                candidates
                    .iter()
                    .map(Coordinate::format_coordinates)
                    .collect::<Vec<_>>()
            );
        }

        Ok(candidates)
    }
}

/// Geocoding response from Open-Meteo. `results` is omitted when nothing matches.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

impl From<GeocodingResult> for Coordinate {
    fn from(result: GeocodingResult) -> Self {
        Coordinate::new(result.latitude, result.longitude)
    }
}
