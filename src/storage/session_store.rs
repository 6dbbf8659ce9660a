//! Best-effort persistence of chat sessions
//!
//! Two keys are used in the backing store: one holds the session envelope
//! (`{"sessions": [...], "lastUpdated": ...}`), the other the identifier of
//! the current session. They are written independently; only
//! [`SessionStore::delete_session`] reconciles them.
//!
//! Every operation comes in two flavours. The plain one never fails: backend
//! and decoding errors are reported through [`DevLog`] and degrade to an
//! empty result or a [`PersistOutcome::Failed`] status. The `try_*` variant
//! returns the error instead.
//!
//! Read-modify-write operations are not atomic. Two writers interleaving
//! between load and save lose the earlier write in full.

use super::types::{
    ChatMessage, ChatSession, PersistOutcome, SessionEnvelope, SessionPatch, StorageInfo,
};
use super::KeyValueStore;
use crate::config::StorageConfig;
use crate::devlog::DevLog;
use crate::error::{GramcheckError, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default key of the session envelope
pub const DEFAULT_SESSIONS_KEY: &str = "gramcheck.sessions";

/// Default key of the current-session pointer
pub const DEFAULT_CURRENT_SESSION_KEY: &str = "gramcheck.current_session";

/// Borrowed form of [`SessionEnvelope`] used for writing
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    sessions: &'a [ChatSession],
    last_updated: DateTime<Utc>,
}

/// Session persistence over a [`KeyValueStore`]
///
/// # Examples
///
/// ```
/// use gramcheck::devlog::DevLog;
/// use gramcheck::storage::{ChatMessage, ChatSession, MemoryStore, SessionStore};
///
/// let store = SessionStore::new(MemoryStore::new(), DevLog::disabled());
/// store.add_session(ChatSession::with_id("s1", "Essay"));
/// store.add_message("s1", ChatMessage::user("Me and him went."));
///
/// let sessions = store.load_sessions();
/// assert_eq!(sessions[0].messages.len(), 1);
/// ```
pub struct SessionStore<S> {
    backend: S,
    log: DevLog,
    sessions_key: String,
    current_session_key: String,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create a store using the default keys
    pub fn new(backend: S, log: DevLog) -> Self {
        Self {
            backend,
            log,
            sessions_key: DEFAULT_SESSIONS_KEY.to_string(),
            current_session_key: DEFAULT_CURRENT_SESSION_KEY.to_string(),
        }
    }

    /// Create a store using the keys named in `config`
    pub fn from_config(backend: S, config: &StorageConfig, log: DevLog) -> Self {
        Self::new(backend, log).with_keys(&config.sessions_key, &config.current_session_key)
    }

    /// Replace the storage keys
    pub fn with_keys(mut self, sessions_key: &str, current_session_key: &str) -> Self {
        self.sessions_key = sessions_key.to_string();
        self.current_session_key = current_session_key.to_string();
        self
    }

    /// The underlying backend
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Key holding the session envelope
    pub fn sessions_key(&self) -> &str {
        &self.sessions_key
    }

    /// Key holding the current-session pointer
    pub fn current_session_key(&self) -> &str {
        &self.current_session_key
    }

    // ------------------------------------------------------------------
    // Strict operations
    // ------------------------------------------------------------------

    fn read_envelope(&self) -> Result<Option<(String, SessionEnvelope)>> {
        let Some(raw) = self
            .backend
            .get(&self.sessions_key)
            .context("Failed to read session envelope")?
        else {
            return Ok(None);
        };

        let envelope: SessionEnvelope = serde_json::from_str(&raw)
            .map_err(|e| GramcheckError::Storage(format!("Corrupt session envelope: {}", e)))?;

        Ok(Some((raw, envelope)))
    }

    /// Load every stored session
    ///
    /// Returns an empty list when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Fails if the backend read fails or the envelope cannot be decoded.
    pub fn try_load_sessions(&self) -> Result<Vec<ChatSession>> {
        Ok(self
            .read_envelope()?
            .map(|(_, envelope)| envelope.sessions)
            .unwrap_or_default())
    }

    /// Overwrite the stored collection with `sessions`
    ///
    /// # Errors
    ///
    /// Fails if serialization or the backend write fails. The previous
    /// envelope is left intact in that case.
    pub fn try_save_sessions(&self, sessions: &[ChatSession]) -> Result<()> {
        let envelope = EnvelopeRef {
            sessions,
            last_updated: Utc::now(),
        };
        let raw = serde_json::to_string(&envelope).map_err(GramcheckError::from)?;

        self.backend
            .set(&self.sessions_key, &raw)
            .context("Failed to write session envelope")?;

        tracing::debug!(count = sessions.len(), bytes = raw.len(), "Saved chat sessions");
        Ok(())
    }

    /// Read the current-session pointer
    pub fn try_load_current_session_id(&self) -> Result<Option<String>> {
        self.backend
            .get(&self.current_session_key)
            .context("Failed to read current session id")
    }

    /// Write the current-session pointer, or remove it when `id` is `None`
    pub fn try_save_current_session_id(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self
                .backend
                .set(&self.current_session_key, id)
                .context("Failed to write current session id"),
            None => self
                .backend
                .remove(&self.current_session_key)
                .context("Failed to remove current session id"),
        }
    }

    /// Append `session` to the stored collection
    pub fn try_add_session(&self, session: ChatSession) -> Result<()> {
        let mut sessions = self.try_load_sessions()?;
        sessions.push(session);
        self.try_save_sessions(&sessions)
    }

    /// Merge `patch` over the first session with `id` and stamp `updated_at`
    ///
    /// Returns `false` without writing when no such session exists.
    pub fn try_update_session(&self, id: &str, patch: SessionPatch) -> Result<bool> {
        let mut sessions = self.try_load_sessions()?;
        let Some(session) = sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };

        patch.apply_to(session);
        session.touch();

        self.try_save_sessions(&sessions)?;
        Ok(true)
    }

    /// Remove every session with `id`; clear the pointer if it names `id`
    ///
    /// Returns the number of sessions removed.
    pub fn try_delete_session(&self, id: &str) -> Result<usize> {
        let mut sessions = self.try_load_sessions()?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        let removed = before - sessions.len();

        self.try_save_sessions(&sessions)?;

        if self.try_load_current_session_id()?.as_deref() == Some(id) {
            self.try_save_current_session_id(None)?;
        }

        Ok(removed)
    }

    /// Append `message` to the session with `session_id` and stamp `updated_at`
    ///
    /// Returns `false` without writing when no such session exists.
    pub fn try_add_message(&self, session_id: &str, message: ChatMessage) -> Result<bool> {
        let mut sessions = self.try_load_sessions()?;
        let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) else {
            return Ok(false);
        };

        session.messages.push(message);
        session.touch();

        self.try_save_sessions(&sessions)?;
        Ok(true)
    }

    /// Remove both the envelope and the pointer
    ///
    /// Both removals are attempted even if the first one fails.
    pub fn try_clear_all(&self) -> Result<()> {
        let sessions = self
            .backend
            .remove(&self.sessions_key)
            .context("Failed to remove session envelope");
        let current = self
            .backend
            .remove(&self.current_session_key)
            .context("Failed to remove current session id");
        sessions?;
        current
    }

    /// Size of the stored envelope and number of sessions in it
    pub fn try_storage_info(&self) -> Result<StorageInfo> {
        Ok(self
            .read_envelope()?
            .map(|(raw, envelope)| StorageInfo {
                byte_size: raw.len(),
                session_count: envelope.sessions.len(),
            })
            .unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Best-effort operations
    // ------------------------------------------------------------------

    fn outcome(&self, what: &str, result: Result<bool>) -> PersistOutcome {
        match result {
            Ok(true) => PersistOutcome::Persisted,
            Ok(false) => PersistOutcome::Unchanged,
            Err(e) => {
                self.log.error(format_args!("Failed to {}: {:#}", what, e));
                PersistOutcome::Failed
            }
        }
    }

    /// Load every stored session; empty on any failure
    pub fn load_sessions(&self) -> Vec<ChatSession> {
        self.try_load_sessions().unwrap_or_else(|e| {
            self.log
                .error(format_args!("Failed to load chat sessions: {:#}", e));
            Vec::new()
        })
    }

    /// Overwrite the stored collection; failures are logged
    pub fn save_sessions(&self, sessions: &[ChatSession]) -> PersistOutcome {
        self.outcome(
            "save chat sessions",
            self.try_save_sessions(sessions).map(|()| true),
        )
    }

    /// Read the current-session pointer; `None` on any failure
    pub fn load_current_session_id(&self) -> Option<String> {
        self.try_load_current_session_id().unwrap_or_else(|e| {
            self.log
                .error(format_args!("Failed to load current session id: {:#}", e));
            None
        })
    }

    /// Write or remove the current-session pointer; failures are logged
    pub fn save_current_session_id(&self, id: Option<&str>) -> PersistOutcome {
        self.outcome(
            "save current session id",
            self.try_save_current_session_id(id).map(|()| true),
        )
    }

    /// Append a session; failures are logged
    pub fn add_session(&self, session: ChatSession) -> PersistOutcome {
        self.outcome("add session", self.try_add_session(session).map(|()| true))
    }

    /// Patch a session; `Unchanged` if it does not exist
    pub fn update_session(&self, id: &str, patch: SessionPatch) -> PersistOutcome {
        self.outcome("update session", self.try_update_session(id, patch))
    }

    /// Delete a session and reconcile the pointer; failures are logged
    pub fn delete_session(&self, id: &str) -> PersistOutcome {
        self.outcome("delete session", self.try_delete_session(id).map(|_| true))
    }

    /// Append a message; `Unchanged` if the session does not exist
    pub fn add_message(&self, session_id: &str, message: ChatMessage) -> PersistOutcome {
        self.outcome("add message", self.try_add_message(session_id, message))
    }

    /// Remove all stored data; failures are logged
    pub fn clear_all(&self) -> PersistOutcome {
        self.outcome("clear chat storage", self.try_clear_all().map(|()| true))
    }

    /// Envelope size and session count; zeros on any failure
    pub fn get_storage_info(&self) -> StorageInfo {
        self.try_storage_info().unwrap_or_else(|e| {
            self.log
                .error(format_args!("Failed to read storage info: {:#}", e));
            StorageInfo::default()
        })
    }

    /// Find a stored session by identifier
    pub fn get_session(&self, id: &str) -> Option<ChatSession> {
        self.load_sessions().into_iter().find(|s| s.id == id)
    }

    /// The session the pointer refers to, if it still exists
    pub fn current_session(&self) -> Option<ChatSession> {
        let id = self.load_current_session_id()?;
        self.get_session(&id)
    }
}
