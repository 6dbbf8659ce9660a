//! Chat session storage
//!
//! A [`KeyValueStore`] is the capability every backend provides: a
//! synchronous text store addressed by string keys. [`SessionStore`] layers
//! the session envelope and the current-session pointer on top of any
//! backend.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{GramcheckError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;

pub mod file;
pub mod memory;
pub mod session_store;
pub mod sled_store;
pub mod sqlite;
pub mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session_store::SessionStore;
pub use sled_store::SledStore;
pub use sqlite::SqliteStore;
pub use types::{
    new_message_id, new_session_id, ChatMessage, ChatSession, MessageRole, PersistOutcome,
    SessionEnvelope, SessionPatch, StorageInfo,
};

/// Synchronous key-value text store
///
/// Every call may fail (missing medium, corruption, quota, permissions).
/// A single `set` must be atomic: after a failed `set` the previous value
/// is still readable.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Open the backend selected by `config`
///
/// File-backed backends live under `config.path` when set, otherwise under
/// the platform data directory.
///
/// # Errors
///
/// Returns `GramcheckError::Storage` if the data directory cannot be
/// determined or the backend cannot be opened.
pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    let backend: Box<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::File => Box::new(FileStore::new(resolve_path(config, "sessions")?)?),
        StorageBackend::Sqlite => Box::new(SqliteStore::new(resolve_path(config, "sessions.db")?)?),
        StorageBackend::Sled => Box::new(SledStore::new(resolve_path(config, "sessions.sled")?)?),
    };
    tracing::debug!(backend = ?config.backend, "Opened session storage backend");
    Ok(backend)
}

fn resolve_path(config: &StorageConfig, default_name: &str) -> Result<PathBuf> {
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "gramcheck", "gramcheck")
        .ok_or_else(|| GramcheckError::Storage("Could not determine data directory".into()))?;

    Ok(proj_dirs.data_dir().join(default_name))
}
