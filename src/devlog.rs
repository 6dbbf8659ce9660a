//! Development diagnostics and tracing setup
//!
//! [`DevLog`] is a gated pass-through for diagnostics emitted by the
//! best-effort storage layer. The gate is a plain value handed in at
//! construction, resolved once by configuration loading; the logger itself
//! never inspects the environment.

use crate::config::LoggingConfig;
use crate::error::Result;
use std::fmt::Display;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment-gated diagnostic sink
///
/// When enabled, each entry point forwards its message verbatim as a
/// `tracing` event at the matching level. When disabled, every call is a
/// no-op.
///
/// # Examples
///
/// ```
/// use gramcheck::devlog::DevLog;
///
/// let log = DevLog::new(true);
/// log.warn("storage quota nearly exhausted");
///
/// let quiet = DevLog::disabled();
/// assert!(!quiet.is_enabled());
/// quiet.error("never printed");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DevLog {
    enabled: bool,
}

impl DevLog {
    /// Create a logger with an explicit gate
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Logger that drops everything
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether messages are forwarded
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Forward an informational message
    pub fn info(&self, message: impl Display) {
        if self.enabled {
            tracing::info!("{}", message);
        }
    }

    /// Forward a warning
    pub fn warn(&self, message: impl Display) {
        if self.enabled {
            tracing::warn!("{}", message);
        }
    }

    /// Forward an error
    pub fn error(&self, message: impl Display) {
        if self.enabled {
            tracing::error!("{}", message);
        }
    }
}

/// Decide whether an environment indicator names a development build
///
/// Accepts `development` and `dev` in any case; everything else, including
/// an empty value, is treated as production.
pub fn is_development_env(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "development" | "dev")
}

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.level`. JSON output is used
/// when `config.json_format` is set, human-readable output otherwise.
///
/// # Errors
///
/// Returns an error if the level filter is invalid or a global subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
