//! Error types and handling for the weather dashboard

use thiserror::Error;

/// Main error type for the weather dashboard
#[derive(Error, Debug)]
pub enum WeatherAppError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Required input missing or malformed
    #[error("{message}")]
    Validation { message: String },

    /// Lookup that matched nothing (geocoding miss, unknown history entry)
    #[error("{message}")]
    NotFound { message: String },

    /// Transport, status or decoding failures from the external weather APIs
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// History file encoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl WeatherAppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Get the message surfaced to HTTP callers
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherAppError::Validation { message } | WeatherAppError::NotFound { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}
