//! Location model for geographic coordinates and stored cities

use serde::Serialize;

/// Latitude/longitude pair. Ranges are not validated.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A row of the `cities` table
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CityRecord {
    /// Insertion order key
    pub id: i64,
    /// City name as queried, unique
    pub name: String,
    pub coordinate: Coordinate,
}
