//! Gramcheck - chat session persistence for a grammar-checking assistant
//!
//! This library provides the client-side pieces of the assistant: durable
//! storage of chat sessions, a development-gated diagnostic logger, and a
//! headless model of the floating action menu.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Session types, the `KeyValueStore` capability and its
//!   backends, and the best-effort `SessionStore`
//! - `devlog`: Development diagnostics and tracing setup
//! - `action_menu`: Open/closed menu state with caller-supplied handlers
//! - `commands`: CLI command handlers (session management, chat loop)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use gramcheck::devlog::DevLog;
//! use gramcheck::storage::{ChatMessage, ChatSession, MemoryStore, SessionStore};
//!
//! let store = SessionStore::new(MemoryStore::new(), DevLog::new(false));
//! let session = ChatSession::new("Cover letter");
//! let id = session.id.clone();
//!
//! store.add_session(session);
//! store.save_current_session_id(Some(&id));
//! store.add_message(&id, ChatMessage::user("I look forward to hear from you."));
//!
//! assert_eq!(store.get_storage_info().session_count, 1);
//! assert_eq!(store.current_session().unwrap().messages.len(), 1);
//! ```

pub mod action_menu;
pub mod cli;
pub mod commands;
pub mod config;
pub mod devlog;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use action_menu::{ActionMenu, MenuAction};
pub use config::Config;
pub use devlog::DevLog;
pub use error::{GramcheckError, Result};
pub use storage::{
    ChatMessage, ChatSession, KeyValueStore, PersistOutcome, SessionPatch, SessionStore,
};

#[cfg(test)]
pub mod test_utils;
