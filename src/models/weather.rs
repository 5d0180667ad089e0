//! Single forecast reading

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading from the forecast feed. Immutable once built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Time the reading applies to
    pub date: DateTime<Utc>,
    /// Temperature in the configured unit system
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in the configured unit system
    pub wind_speed: f64,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Provider icon code, e.g. `10d`
    pub icon: String,
}

impl ForecastPoint {
    /// Format temperature for log output
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°", self.temperature)
    }
}
