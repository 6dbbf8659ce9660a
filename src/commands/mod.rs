/*!
Command handlers for the CLI

- `sessions`: Session CRUD (`gramcheck sessions ...`)
- `chat`: Interactive chat loop driven through the action menu

Both handlers operate on a [`SessionStore`] opened from configuration.
*/

use crate::config::Config;
use crate::devlog::DevLog;
use crate::error::Result;
use crate::storage::{open_backend, KeyValueStore, SessionStore};

// Interactive chat handler
pub mod chat;

// Session management commands
pub mod sessions;

// Special commands parser for the chat loop
pub mod special_commands;

/// Open the session store described by `config`
///
/// # Errors
///
/// Returns an error if the configured backend cannot be opened.
pub fn open_session_store(config: &Config) -> Result<SessionStore<Box<dyn KeyValueStore>>> {
    let backend = open_backend(&config.storage)?;
    let log = DevLog::new(config.logging.dev_mode);
    Ok(SessionStore::from_config(backend, &config.storage, log))
}
