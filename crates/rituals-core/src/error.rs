//! Core error types for rituals-core.
//!
//! Most of these never reach the user: log failures are caught and discarded
//! at the call site, and bad input is recovered with defaults. They exist so
//! that the places where errors are swallowed stay explicit.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rituals-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Event log errors
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    /// Terminal or process IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Event log errors.
#[derive(Error, Debug)]
pub enum LogError {
    /// The log file could not be opened or written
    #[error("Failed to append to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The event could not be encoded as JSON
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home directory could not be prepared
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read_config(path: &str) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    #[test]
    fn io_errors_convert() {
        let err = read_config("/nonexistent/rituals/config.toml").unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().starts_with("IO error:"));
    }

    #[test]
    fn nested_errors_keep_their_message() {
        let err: CoreError = ConfigError::UnknownKey("one.nope".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown config key: one.nope"
        );
        let err: CoreError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
