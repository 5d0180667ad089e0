use std::sync::Arc;

use anyhow::Result;
use weather_dashboard::{
    AppConfig, AppState, JsonHistoryStore, OpenWeatherClient, telemetry, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    telemetry::init(&config.logging)?;

    let weather = OpenWeatherClient::new(&config.weather)?;
    let history = JsonHistoryStore::new(config.history.path.clone());
    tracing::info!(
        "Recording search history in {}",
        history.path().display()
    );

    let state = AppState::new(Arc::new(weather), Arc::new(history));
    web::run(state, &config.server).await
}
