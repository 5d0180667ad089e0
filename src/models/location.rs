//! Resolved geographic coordinates

use serde::{Deserialize, Serialize};

/// Result of a geocoding lookup. Lives for a single request only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical place name from the provider
    pub name: String,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
