use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use ulid::Ulid;

/// Session fields that metadata entries may not shadow
pub const RESERVED_SESSION_KEYS: [&str; 5] = ["id", "title", "createdAt", "updatedAt", "messages"];

/// Message fields that extra entries may not shadow
pub const RESERVED_MESSAGE_KEYS: [&str; 4] = ["id", "role", "content", "timestamp"];

/// Author of a chat turn
///
/// Stored as a plain string. Tags written by other clients are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageRole {
    /// Text typed by the user
    User,
    /// Reply produced by the grammar assistant
    Assistant,
    /// Out-of-band notice (e.g. "session cleared")
    System,
    /// Any other author tag
    Other(String),
}

impl MessageRole {
    /// Parse one of the built-in role names, case-insensitively
    ///
    /// Returns `None` for anything else; use `MessageRole::from` to accept
    /// arbitrary tags.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// The tag as stored
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for MessageRole {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Other(tag),
        }
    }
}

impl From<MessageRole> for String {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn serialize_unreserved<S: Serializer>(
    map: &BTreeMap<String, Value>,
    reserved: &[&str],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(map.iter().filter(|(key, _)| !reserved.contains(&key.as_str())))
}

fn serialize_session_metadata<S: Serializer>(
    map: &BTreeMap<String, Value>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serialize_unreserved(map, &RESERVED_SESSION_KEYS, serializer)
}

fn serialize_message_extra<S: Serializer>(
    map: &BTreeMap<String, Value>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serialize_unreserved(map, &RESERVED_MESSAGE_KEYS, serializer)
}

/// One turn of a conversation
///
/// Messages are created by the chat logic, appended to a session and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique identifier for the message
    pub id: String,
    /// Who produced the message
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Fields written by other clients, kept as-is
    ///
    /// Entries named like a built-in field are never written.
    #[serde(flatten, serialize_with = "serialize_message_extra")]
    pub extra: BTreeMap<String, Value>,
}

impl ChatMessage {
    /// Create a message with a fresh identifier stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use gramcheck::storage::{ChatMessage, MessageRole};
    ///
    /// let msg = ChatMessage::new(MessageRole::User, "Their going home.");
    /// assert_eq!(msg.role, MessageRole::User);
    /// assert_eq!(msg.id.len(), 26);
    /// ```
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self::with_id(new_message_id(), role, content)
    }

    /// Create a message with a caller-chosen identifier
    pub fn with_id(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            extra: BTreeMap::new(),
        }
    }

    /// Shorthand for a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Shorthand for an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Shorthand for a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// A stored conversation
///
/// Fields the crate does not know about are kept in `metadata` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique identifier for the session
    pub id: String,
    /// User-friendly title
    #[serde(default)]
    pub title: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session was last updated
    pub updated_at: DateTime<Utc>,
    /// Conversation turns in insertion order
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Caller-defined metadata
    ///
    /// Entries named like a built-in field are never written.
    #[serde(flatten, serialize_with = "serialize_session_metadata")]
    pub metadata: BTreeMap<String, Value>,
}

impl ChatSession {
    /// Create an empty session with a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use gramcheck::storage::ChatSession;
    ///
    /// let session = ChatSession::new("Cover letter");
    /// assert!(session.messages.is_empty());
    /// assert_eq!(session.created_at, session.updated_at);
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(new_session_id(), title)
    }

    /// Create an empty session with a caller-chosen identifier
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Bump `updated_at` to now
    ///
    /// The stamp never moves backwards and never precedes `created_at`,
    /// even if the wall clock does.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at).max(self.created_at);
    }
}

/// Partial update for a session
///
/// Only the fields that are `Some` are applied. Metadata entries are merged
/// key by key; a `Value::Null` entry removes the key. Entries named like a
/// built-in session field are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    /// Replacement title
    pub title: Option<String>,
    /// Replacement message sequence
    pub messages: Option<Vec<ChatMessage>>,
    /// Metadata entries to merge
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl SessionPatch {
    /// Patch that only sets the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces the message sequence
    pub fn messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Some(messages),
            ..Self::default()
        }
    }

    /// Add a metadata entry to this patch
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }

    /// Merge the patch over `session`
    ///
    /// Does not touch `updated_at`; callers decide when to stamp it.
    pub fn apply_to(self, session: &mut ChatSession) {
        if let Some(title) = self.title {
            session.title = title;
        }
        if let Some(messages) = self.messages {
            session.messages = messages;
        }
        if let Some(metadata) = self.metadata {
            for (key, value) in metadata {
                if RESERVED_SESSION_KEYS.contains(&key.as_str()) {
                    continue;
                }
                if value.is_null() {
                    session.metadata.remove(&key);
                } else {
                    session.metadata.insert(key, value);
                }
            }
        }
    }
}

/// Document stored under the sessions key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnvelope {
    /// Every stored session, in insertion order
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
    /// When the envelope was written
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

/// Size summary of the persisted envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    /// Length in bytes of the serialized envelope
    pub byte_size: usize,
    /// Number of sessions in the envelope
    pub session_count: usize,
}

/// Result of a best-effort write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The backend accepted the write
    Persisted,
    /// Nothing needed writing (e.g. unknown session id)
    Unchanged,
    /// The backend rejected the write; the failure was logged
    Failed,
}

impl PersistOutcome {
    /// True if the write reached the backend
    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// Generate a new ULID for a session
pub fn new_session_id() -> String {
    Ulid::new().to_string()
}

/// Generate a new ULID for a message
pub fn new_message_id() -> String {
    Ulid::new().to_string()
}
