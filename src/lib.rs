//! Weather dashboard backend
//!
//! Resolves a city name to coordinates, fetches a multi-day forecast from
//! OpenWeather, reduces it to one reading per day and keeps a persisted
//! history of searched cities.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::AppConfig;
pub use error::WeatherAppError;
pub use history::{HistoryRepository, JsonHistoryStore};
pub use models::{City, CityForecast, Coordinates, ForecastPoint};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherAppError>;
