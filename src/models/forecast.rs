//! Reduced per-day forecast returned to callers

use super::ForecastPoint;
use serde::{Deserialize, Serialize};

/// Upper bound on points in a forecast: the current reading plus four days
pub const MAX_FORECAST_POINTS: usize = 5;

/// Output of a weather lookup for one city query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityForecast {
    /// Canonical place name from the geocoding provider
    pub resolved_name: String,
    /// Index 0 is the current reading, then one point per following day
    pub forecast: Vec<ForecastPoint>,
}

impl CityForecast {
    #[must_use]
    pub fn new(resolved_name: impl Into<String>, forecast: Vec<ForecastPoint>) -> Self {
        Self {
            resolved_name: resolved_name.into(),
            forecast,
        }
    }

    /// Get current weather (first forecast item)
    #[must_use]
    pub fn current_weather(&self) -> Option<&ForecastPoint> {
        self.forecast.first()
    }

    /// Readings for the days after the current one
    #[must_use]
    pub fn upcoming_days(&self) -> &[ForecastPoint] {
        self.forecast.get(1..).unwrap_or_default()
    }
}
