//! Error types for Gramcheck
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Gramcheck operations
///
/// Covers configuration loading, key-value backend access, envelope
/// (de)serialization and session lookups. Best-effort store operations
/// never surface these; the strict `try_*` variants do.
#[derive(Error, Debug)]
pub enum GramcheckError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session storage errors (envelope or pointer handling)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Key-value backend errors (file system, database, quota)
    #[error("Backend error: {0}")]
    Backend(String),

    /// No session with the given identifier exists
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A user-supplied value could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Gramcheck operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
