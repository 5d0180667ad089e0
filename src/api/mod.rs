use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::history::HistoryRepository;
use crate::models::{City, ForecastPoint};
use crate::weather::WeatherProvider;

pub mod error;

pub use error::{ApiError, MessageResponse};

pub const CITY_REQUIRED: &str = "City name is required";

/// Components shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherProvider>,
    pub history: Arc<dyn HistoryRepository>,
}

impl AppState {
    pub fn new(weather: Arc<dyn WeatherProvider>, history: Arc<dyn HistoryRepository>) -> Self {
        Self { weather, history }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("weather", &"<WeatherProvider>")
            .field("history", &"<HistoryRepository>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitCityRequest {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub city: City,
    pub weather: Vec<ForecastPoint>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(submit_city))
        .route("/history", get(list_history))
        .route("/history/{id}", delete(delete_history_entry))
        .with_state(state)
}

/// POST / - fetch the forecast for a city and record it in the history
#[instrument(skip_all)]
async fn submit_city(
    State(state): State<AppState>,
    payload: Result<Json<SubmitCityRequest>, JsonRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let city = payload
        .ok()
        .and_then(|Json(request)| request.city)
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
        .ok_or_else(|| ApiError::BadRequest(CITY_REQUIRED.to_string()))?;

    let lookup = state
        .weather
        .get_weather_for_city(&city)
        .await
        .map_err(|e| {
            error!(query = %city, "Weather lookup failed: {e}");
            internal_error(e.user_message(), "Failed to get weather data")
        })?;

    // History keeps the provider's canonical name, not the raw query
    let saved = state
        .history
        .add_city(&lookup.resolved_name)
        .await
        .map_err(|e| {
            error!(name = %lookup.resolved_name, "Saving search history failed: {e}");
            internal_error(e.user_message(), "Failed to get weather data")
        })?;

    info!(query = %city, resolved = %saved.name, "Served weather");
    Ok(Json(WeatherResponse {
        city: saved,
        weather: lookup.forecast,
    }))
}

/// GET /history
#[instrument(skip_all)]
async fn list_history(State(state): State<AppState>) -> Result<Json<Vec<City>>, ApiError> {
    state.history.list_cities().await.map(Json).map_err(|e| {
        error!("Getting search history failed: {e}");
        ApiError::Internal("Failed to get search history".to_string())
    })
}

/// DELETE /history/{id}
#[instrument(skip(state))]
async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.history.remove_city(&id).await {
        Ok(true) => Ok(Json(MessageResponse::new("City removed from history"))),
        Ok(false) => {
            warn!("No history entry to delete");
            Err(ApiError::NotFound("City not found in history".to_string()))
        }
        Err(e) => {
            error!("Deleting history entry failed: {e}");
            Err(ApiError::Internal(
                "Failed to delete city from history".to_string(),
            ))
        }
    }
}

fn internal_error(message: String, fallback: &str) -> ApiError {
    if message.trim().is_empty() {
        ApiError::Internal(fallback.to_string())
    } else {
        ApiError::Internal(message)
    }
}
