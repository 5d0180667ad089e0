//! Search history entry

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A previously searched city, as persisted in the history file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct City {
    /// Unique identifier generated at creation (UUID v4 text)
    pub id: String,
    /// Display name as resolved by the geocoding provider
    pub name: String,
}

impl City {
    /// Create a city with a freshly generated identifier
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used for de-duplication
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
