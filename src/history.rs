//! Search history persistence
//!
//! The whole history is a single JSON array rewritten on every mutation.
//! Reads are lenient: a missing or corrupt file is an empty history.
//! Mutations are read-modify-write without locking, so two overlapping
//! requests can lose one of their writes.

use crate::Result;
use crate::models::City;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Storage for previously searched cities
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// All cities in insertion order
    async fn list_cities(&self) -> Result<Vec<City>>;

    /// Return the existing entry matching `name` case-insensitively, or append a new one
    async fn add_city(&self, name: &str) -> Result<City>;

    /// Remove the entry with exactly this id; `false` when nothing matched
    async fn remove_city(&self, id: &str) -> Result<bool>;
}

/// History stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Vec<City> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %self.path.display(), "History file not readable: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<City>>(&data) {
            Ok(cities) => cities,
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring corrupt history file: {e}");
                Vec::new()
            }
        }
    }

    async fn write(&self, cities: &[City]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let json = serde_json::to_string_pretty(cities)?;
        fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), count = cities.len(), "History written");
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryStore {
    async fn list_cities(&self) -> Result<Vec<City>> {
        Ok(self.read().await)
    }

    #[instrument(name = "add_city", level = "debug", skip(self))]
    async fn add_city(&self, name: &str) -> Result<City> {
        let mut cities = self.read().await;

        if let Some(existing) = cities.iter().find(|city| city.has_name(name)) {
            debug!(id = %existing.id, "City already in history");
            return Ok(existing.clone());
        }

        let city = City::new(name);
        cities.push(city.clone());
        self.write(&cities).await?;

        info!(id = %city.id, name = %city.name, "Added city to history");
        Ok(city)
    }

    #[instrument(name = "remove_city", level = "debug", skip(self))]
    async fn remove_city(&self, id: &str) -> Result<bool> {
        let mut cities = self.read().await;
        let initial_len = cities.len();

        cities.retain(|city| city.id != id);

        if cities.len() == initial_len {
            return Ok(false);
        }

        self.write(&cities).await?;
        info!(id, "Removed city from history");
        Ok(true)
    }
}
