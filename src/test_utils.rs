//! Test utilities for Gramcheck
//!
//! Helpers shared by the unit test modules: scratch directories, stores
//! wired to throwaway backends, and session fixtures.

use crate::devlog::DevLog;
use crate::storage::{ChatMessage, ChatSession, FileStore, MemoryStore, SessionStore};
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Session store over a fresh in-memory backend
pub fn memory_session_store() -> SessionStore<MemoryStore> {
    SessionStore::new(MemoryStore::new(), DevLog::disabled())
}

/// Session store over a `FileStore` in a temporary directory
///
/// The directory is returned alongside so the caller keeps it alive.
pub fn file_session_store() -> (SessionStore<FileStore>, TempDir) {
    let dir = temp_dir();
    let backend = FileStore::new(dir.path().join("kv")).expect("Failed to create file store");
    (SessionStore::new(backend, DevLog::disabled()), dir)
}

/// A session with `n` alternating user/assistant messages
pub fn session_with_messages(id: &str, n: usize) -> ChatSession {
    let mut session = ChatSession::with_id(id, format!("Session {}", id));
    for i in 0..n {
        let message = if i % 2 == 0 {
            ChatMessage::user(format!("draft {}", i))
        } else {
            ChatMessage::assistant(format!("correction {}", i))
        };
        session.messages.push(message);
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_with_messages_alternates_roles() {
        let session = session_with_messages("s1", 3);
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[1].role, crate::storage::MessageRole::Assistant);
    }

    #[test]
    fn test_file_session_store_round_trip() {
        let (store, _dir) = file_session_store();
        let session = session_with_messages("s1", 2);
        store.add_session(session.clone());
        assert_eq!(store.load_sessions(), vec![session]);
    }

    #[test]
    fn test_memory_session_store_starts_empty() {
        assert!(memory_session_store().load_sessions().is_empty());
    }
}
