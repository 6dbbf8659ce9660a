//! Configuration management for Gramcheck
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::devlog::is_development_env;
use crate::error::{GramcheckError, Result};
use crate::storage::file::file_name_for;
use crate::storage::session_store::{DEFAULT_CURRENT_SESSION_KEY, DEFAULT_SESSIONS_KEY};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main configuration structure for Gramcheck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key-value backend holds the sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One file per key in a directory
    #[default]
    File,
    /// SQLite database file
    Sqlite,
    /// Embedded sled database
    Sled,
    /// Process memory; nothing survives exit
    Memory,
}

impl StorageBackend {
    /// Parse a backend name, case-insensitively
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            "sled" => Ok(Self::Sled),
            "memory" => Ok(Self::Memory),
            other => Err(GramcheckError::Config(format!(
                "Invalid storage backend: {}. Must be one of: file, sqlite, sled, memory",
                other
            ))
            .into()),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Sqlite => "sqlite",
            Self::Sled => "sled",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend type
    #[serde(default)]
    pub backend: StorageBackend,

    /// Location of the backend (directory for `file`, database path
    /// otherwise). Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key holding the session envelope
    #[serde(default = "default_sessions_key")]
    pub sessions_key: String,

    /// Key holding the current-session pointer
    #[serde(default = "default_current_session_key")]
    pub current_session_key: String,
}

fn default_sessions_key() -> String {
    DEFAULT_SESSIONS_KEY.to_string()
}

fn default_current_session_key() -> String {
    DEFAULT_CURRENT_SESSION_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            sessions_key: default_sessions_key(),
            current_session_key: default_current_session_key(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON-formatted logs
    #[serde(default)]
    pub json_format: bool,

    /// Forward storage diagnostics (development builds)
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_log_level() -> String {
    "gramcheck=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            dev_mode: false,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed, or if
    /// a CLI override is invalid.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli)?;

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(GramcheckError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(GramcheckError::from)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(env) = std::env::var("GRAMCHECK_ENV") {
            self.logging.dev_mode = is_development_env(&env);
            tracing::debug!(dev_mode = self.logging.dev_mode, "Env override: GRAMCHECK_ENV");
        }

        if let Ok(backend) = std::env::var("GRAMCHECK_STORAGE_BACKEND") {
            match StorageBackend::parse_str(&backend) {
                Ok(b) => self.storage.backend = b,
                Err(_) => tracing::warn!("Invalid GRAMCHECK_STORAGE_BACKEND: {}", backend),
            }
        }

        if let Ok(dir) = std::env::var("GRAMCHECK_STORAGE_DIR") {
            self.storage.path = Some(PathBuf::from(dir));
        }

        if let Ok(key) = std::env::var("GRAMCHECK_SESSIONS_KEY") {
            self.storage.sessions_key = key;
        }

        if let Ok(key) = std::env::var("GRAMCHECK_CURRENT_SESSION_KEY") {
            self.storage.current_session_key = key;
        }

        if let Ok(level) = std::env::var("GRAMCHECK_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json_logs) = std::env::var("GRAMCHECK_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => tracing::warn!("Invalid value for GRAMCHECK_JSON_LOGS: {}", json_logs),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) -> Result<()> {
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(backend) = &cli.backend {
            self.storage.backend = StorageBackend::parse_str(backend)?;
        }

        if cli.verbose {
            self.logging.level = "gramcheck=debug".to_string();
            self.logging.dev_mode = true;
        }

        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if a key is empty, both keys are equal, or the log
    /// level is empty.
    pub fn validate(&self) -> Result<()> {
        if self.storage.sessions_key.trim().is_empty() {
            return Err(
                GramcheckError::Config("storage.sessions_key cannot be empty".to_string()).into(),
            );
        }

        if self.storage.current_session_key.trim().is_empty() {
            return Err(GramcheckError::Config(
                "storage.current_session_key cannot be empty".to_string(),
            )
            .into());
        }

        if self.storage.sessions_key == self.storage.current_session_key {
            return Err(GramcheckError::Config(
                "storage.sessions_key and storage.current_session_key must differ".to_string(),
            )
            .into());
        }

        if self.storage.backend == StorageBackend::File
            && file_name_for(&self.storage.sessions_key)
                == file_name_for(&self.storage.current_session_key)
        {
            return Err(GramcheckError::Config(format!(
                "storage.sessions_key and storage.current_session_key map to the same file ({}.json)",
                file_name_for(&self.storage.sessions_key)
            ))
            .into());
        }

        if self.logging.level.trim().is_empty() {
            return Err(GramcheckError::Config("logging.level cannot be empty".to_string()).into());
        }

        Ok(())
    }
}
