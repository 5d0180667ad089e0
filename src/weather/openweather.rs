//! OpenWeather API client
//!
//! Resolves a free-text query through the direct geocoding endpoint, then
//! fetches the 5 day / 3 hour forecast feed for the resolved coordinates.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::{WeatherProvider, reduce_to_daily};
use crate::config::WeatherConfig;
use crate::models::{CityForecast, Coordinates, ForecastPoint};
use crate::{Result, WeatherAppError};

/// Message surfaced when geocoding returns no match
pub const CITY_NOT_FOUND: &str = "City not found";

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// HTTP client for the OpenWeather geocoding and forecast APIs
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geocoding_url: String,
    units: String,
}

impl OpenWeatherClient {
    /// Create a new client from configuration. The API key must be present.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| WeatherAppError::config("Weather API key is missing"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherAppError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            units: config.units.clone(),
        })
    }

    fn build_geocode_query(&self, query: &str) -> String {
        format!(
            "{}/direct?q={}&limit=1&appid={}",
            self.geocoding_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }

    fn build_forecast_query(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}/forecast?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            self.units,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Look up the best geocoding match for `query`
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<Coordinates> {
        let results: Vec<api::GeocodingResult> = self
            .get_json("geocoding", &self.build_geocode_query(query))
            .await?;

        let Some(best) = results.into_iter().next() else {
            warn!("No geocoding results for '{}'", query);
            return Err(WeatherAppError::not_found(CITY_NOT_FOUND));
        };

        let coordinates = Coordinates::from(best);
        debug!(
            "Resolved '{}' to {} ({})",
            query,
            coordinates.name,
            coordinates.format_coordinates()
        );
        Ok(coordinates)
    }

    /// Fetch the raw forecast feed and the location's UTC offset
    #[instrument(skip(self, coordinates), fields(coordinates = %coordinates.format_coordinates()))]
    pub async fn fetch_forecast_feed(
        &self,
        coordinates: &Coordinates,
    ) -> Result<(Vec<ForecastPoint>, FixedOffset)> {
        let response: api::ForecastResponse = self
            .get_json("forecast", &self.build_forecast_query(coordinates))
            .await?;

        let offset = response.utc_offset();
        let feed = response
            .list
            .into_iter()
            .map(ForecastPoint::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!("Forecast feed has {} entries", feed.len());
        Ok((feed, offset))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> Result<T> {
        let start = Instant::now();
        let response = self.send(endpoint, url).await?;

        let body = response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", endpoint, e);
            WeatherAppError::upstream(format!("Invalid {endpoint} data received: {e}"))
        })?;

        let elapsed = start.elapsed();
        info!("{} request completed in {:.3}s", endpoint, elapsed.as_secs_f64());
        if elapsed > SLOW_RESPONSE {
            warn!("Slow {} response: {:.3}s", endpoint, elapsed.as_secs_f64());
        }

        Ok(body)
    }

    async fn send(&self, endpoint: &str, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(|e| {
            // the url carries the API key
            let e = e.without_url();
            error!("{} request failed: {}", endpoint, e);
            WeatherAppError::upstream(format!("{endpoint} request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{} request returned HTTP {}", endpoint, status);
            return Err(WeatherAppError::upstream(format!(
                "{endpoint} request failed with status: {status}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn get_weather_for_city(&self, city_query: &str) -> Result<CityForecast> {
        let city_query = city_query.trim();
        if city_query.is_empty() {
            return Err(WeatherAppError::validation("City name is required"));
        }

        let coordinates = self.geocode(city_query).await?;
        let (feed, offset) = self.fetch_forecast_feed(&coordinates).await?;

        if feed.is_empty() {
            return Err(WeatherAppError::upstream(
                "Forecast feed contained no entries",
            ));
        }

        let forecast = CityForecast::new(coordinates.name, reduce_to_daily(&feed, offset));
        if let Some(current) = forecast.current_weather() {
            info!(
                "Forecast for {}: {} now, {} upcoming days",
                forecast.resolved_name,
                current.format_temperature(),
                forecast.upcoming_days().len()
            );
        }

        Ok(forecast)
    }
}

/// OpenWeather response structures and conversion utilities
mod api {
    use super::{Coordinates, ForecastPoint};
    use crate::WeatherAppError;
    use chrono::{DateTime, FixedOffset, Offset, Utc};
    use serde::Deserialize;

    /// Entry of the direct geocoding response array
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub lat: f64,
        pub lon: f64,
    }

    impl From<GeocodingResult> for Coordinates {
        fn from(result: GeocodingResult) -> Self {
            Coordinates::new(result.lat, result.lon, result.name)
        }
    }

    /// 5 day / 3 hour forecast response
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<FeedEntry>,
        pub city: Option<FeedCity>,
    }

    impl ForecastResponse {
        /// Location's shift from UTC, UTC when missing
        pub fn utc_offset(&self) -> FixedOffset {
            self.city
                .as_ref()
                .and_then(|city| city.timezone)
                .and_then(FixedOffset::east_opt)
                .unwrap_or_else(|| Utc.fix())
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct FeedCity {
        /// Shift in seconds from UTC
        pub timezone: Option<i32>,
    }

    #[derive(Debug, Deserialize)]
    pub struct FeedEntry {
        /// Unix timestamp, seconds
        pub dt: i64,
        pub main: MainReadings,
        pub wind: Wind,
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: f64,
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        pub speed: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
        pub icon: String,
    }

    impl TryFrom<FeedEntry> for ForecastPoint {
        type Error = WeatherAppError;

        fn try_from(entry: FeedEntry) -> Result<Self, Self::Error> {
            let date = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                WeatherAppError::upstream(format!("Invalid forecast timestamp: {}", entry.dt))
            })?;
            let condition = entry.weather.into_iter().next().ok_or_else(|| {
                WeatherAppError::upstream("Forecast entry has no weather condition")
            })?;

            Ok(ForecastPoint {
                date,
                temperature: entry.main.temp,
                humidity: entry.main.humidity,
                wind_speed: entry.wind.speed,
                description: condition.description,
                icon: condition.icon,
            })
        }
    }
}
