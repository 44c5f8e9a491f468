use std::path::PathBuf;

/// Errors raised while loading, parsing or projecting an itinerary.
#[derive(thiserror::Error, Debug)]
pub enum ItineraryError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },
    #[error("Feed '{url}' responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("Error reading from '{path}': {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid feed document: {0}")]
    Parse(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Cannot re-anchor {0} onto year {1}")]
    Reanchor(String, i32),
    #[error("Failed to start worker thread: {0}")]
    Spawn(String),
}

/// Errors raised while reading the tracker configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Error reading from '{path}': {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid configuration in '{path}': {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
