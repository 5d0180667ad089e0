//! Weather lookup: geocoding, forecast fetch and day-bucketing

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{FixedOffset, Timelike};

use crate::Result;
use crate::models::{CityForecast, ForecastPoint, MAX_FORECAST_POINTS};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Local hours (inclusive) accepted as a day's representative reading
pub const NOON_WINDOW: std::ops::RangeInclusive<u32> = 11..=14;

/// Source of per-city forecasts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolve `city_query` to a place and return its reduced forecast
    async fn get_weather_for_city(&self, city_query: &str) -> Result<CityForecast>;
}

/// Reduce a chronological feed to the current reading plus one reading per following day.
///
/// Days are computed in `offset` local time. A day is represented by its first
/// reading whose local hour falls in [`NOON_WINDOW`]; days without such a reading
/// are left out. The current reading's day never gets a second entry.
#[must_use]
pub fn reduce_to_daily(feed: &[ForecastPoint], offset: FixedOffset) -> Vec<ForecastPoint> {
    let Some((current, rest)) = feed.split_first() else {
        return Vec::new();
    };

    let mut seen_days = HashSet::from([current.date.with_timezone(&offset).date_naive()]);
    let mut forecast = vec![current.clone()];

    for point in rest {
        if forecast.len() >= MAX_FORECAST_POINTS {
            break;
        }

        let local = point.date.with_timezone(&offset);
        let day = local.date_naive();
        if seen_days.contains(&day) || !NOON_WINDOW.contains(&local.hour()) {
            continue;
        }

        seen_days.insert(day);
        forecast.push(point.clone());
    }

    forecast
}
