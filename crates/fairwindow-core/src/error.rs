//! Core error types for fairwindow-core.
//!
//! Record-level faults in upstream payloads never surface here: they are
//! absorbed by the timeline and provider layers. What remains are the faults
//! that fail a whole call.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fairwindow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upstream data fetch errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Input validation errors raised at the engine entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Latitude or longitude outside the physical range
    #[error("Invalid location: latitude {latitude}, longitude {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// Requested activity duration is not positive
    #[error("Invalid duration: {0} minutes (must be greater than zero)")]
    InvalidDuration(i64),

    /// Timeline step does not divide an hour into whole samples
    #[error("Invalid step: {0} minutes (must divide 60 evenly)")]
    InvalidStep(u32),

    /// Time zone is not a known IANA identifier
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Comfort range whose lower bound exceeds its upper bound
    #[error("Invalid preference for {factor}: min {min} is greater than max {max}")]
    InvalidPreference { factor: String, min: f64, max: f64 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the weather and air-quality fetch collaborator.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("{provider} responded with HTTP {status}")]
    Status { provider: String, status: u16 },

    /// Provider requires an API key that is not set
    #[error("API key for {0} is not set")]
    MissingApiKey(String),

    /// Provider name in configuration is not recognised
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Base URL could not be parsed
    #[error("Invalid provider URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
