//! Data models for the weather dashboard
//!
//! This module contains the core domain models organized by concern:
//! - City: Persisted search history entries
//! - Location: Resolved geographic coordinates
//! - Weather: Single forecast readings
//! - Forecast: The reduced per-day forecast returned to callers

pub mod city;
pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use city::City;
pub use forecast::{CityForecast, MAX_FORECAST_POINTS};
pub use location::Coordinates;
pub use weather::ForecastPoint;
