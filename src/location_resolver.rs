//! Location Resolution Module
//!
//! Resolves city names to coordinates through a read-through cache: the city
//! store is consulted first, and only a miss reaches the geocoding service.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::cache::CityStore;
use crate::geocoding::Geocoder;
use crate::models::Coordinate;
use crate::{ForecastError, Result};

/// Service for resolving city names
#[derive(Clone)]
pub struct CoordinateResolver {
    store: Arc<dyn CityStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(store: Arc<dyn CityStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Return the coordinate for `name`, geocoding and storing it on a miss.
    ///
    /// A failed store lookup is logged and handled like a miss.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<Coordinate> {
        if name.trim().is_empty() {
            return Err(ForecastError::validation("city name must not be empty"));
        }

        match self.store.find(name).await {
            Ok(Some(coordinate)) => {
                debug!("Cache hit: {}", coordinate.format_coordinates());
                return Ok(coordinate);
            }
            Ok(None) => debug!("Cache miss, geocoding"),
            Err(e) => warn!("City lookup failed, falling back to geocoding: {}", e),
        }

        let coordinate = self
            .geocoder
            .search(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::no_results(name))?;

        if !self.store.insert(name, coordinate).await? {
            // Another request stored this city first; its row wins.
            if let Some(stored) = self.store.find(name).await? {
                debug!(
                    "{} already stored at {}",
                    name,
                    stored.format_coordinates()
                );
                return Ok(stored);
            }
        }

        debug!(
            "Resolved and stored {} at {}",
            name,
            coordinate.format_coordinates()
        );
        Ok(coordinate)
    }
}
