//! Error types for till-core

use thiserror::Error;

/// Core error type for Till
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {source}")]
    ConfigParseError {
        path: String,
        source: serde_yaml::Error,
    },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Unknown target name
    #[error("[C004] Target '{name}' not found. Available targets: {available}")]
    TargetNotFound { name: String, available: String },

    /// C005: IO error with file path context
    #[error("[C005] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
