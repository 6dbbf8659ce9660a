use crate::cli::SessionCommand;
use crate::error::{GramcheckError, Result};
use crate::storage::{
    ChatMessage, ChatSession, KeyValueStore, MessageRole, SessionPatch, SessionStore,
};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle `sessions` subcommands
///
/// Uses the strict store operations so storage failures reach the user as
/// errors instead of empty output.
pub fn handle_sessions<S: KeyValueStore>(
    store: &SessionStore<S>,
    command: SessionCommand,
) -> Result<()> {
    match command {
        SessionCommand::List { json } => {
            let sessions = store.try_load_sessions()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }

            if sessions.is_empty() {
                println!("{}", "No chat sessions found.".yellow());
                return Ok(());
            }

            let current = store.try_load_current_session_id()?;

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "".bold(),
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold()
            ]);

            for session in sessions {
                let marker = if current.as_deref() == Some(session.id.as_str()) {
                    "*"
                } else {
                    ""
                };
                let updated = session.updated_at.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    marker.green(),
                    session.id.cyan(),
                    truncate(&display_title(&session), 40),
                    session.messages.len(),
                    updated
                ]);
            }

            println!("\nChat Sessions:");
            table.printstd();
            println!();
        }
        SessionCommand::Show { id, json } => {
            let session = find_session(store, &id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
                return Ok(());
            }

            println!("{} {}", display_title(&session).bold(), session.id.cyan());
            println!(
                "Created {}  Updated {}",
                session.created_at.format("%Y-%m-%d %H:%M:%S"),
                session.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!();
            print_messages(&session);
        }
        SessionCommand::New { title, select } => {
            let session = ChatSession::new(title.unwrap_or_default());
            let id = session.id.clone();
            store.try_add_session(session)?;
            if select {
                store.try_save_current_session_id(Some(&id))?;
            }
            println!("{}", format!("Created session {}", id).green());
        }
        SessionCommand::Rename { id, title } => {
            if !store.try_update_session(&id, SessionPatch::title(title))? {
                return Err(GramcheckError::SessionNotFound(id).into());
            }
            println!("{}", format!("Renamed session {}", id).green());
        }
        SessionCommand::Delete { id } => {
            let removed = store.try_delete_session(&id)?;
            if removed == 0 {
                println!("{}", format!("No session {} to delete", id).yellow());
            } else {
                println!("{}", format!("Deleted session {}", id).green());
            }
        }
        SessionCommand::AddMessage { id, role, content } => {
            let role = MessageRole::parse_str(&role).ok_or_else(|| {
                GramcheckError::InvalidInput(format!(
                    "role '{}' (expected user, assistant or system)",
                    role
                ))
            })?;
            if !store.try_add_message(&id, ChatMessage::new(role.clone(), content))? {
                return Err(GramcheckError::SessionNotFound(id).into());
            }
            println!("{}", format!("Added {} message to {}", role, id).green());
        }
        SessionCommand::Use { id } => {
            find_session(store, &id)?;
            store.try_save_current_session_id(Some(&id))?;
            println!("{}", format!("Current session is now {}", id).green());
        }
        SessionCommand::Current => match store.try_load_current_session_id()? {
            Some(id) => println!("{}", id),
            None => println!("{}", "No current session.".yellow()),
        },
        SessionCommand::Clear => {
            store.try_clear_all()?;
            println!("{}", "Cleared all chat sessions.".green());
        }
        SessionCommand::Info => {
            let info = store.try_storage_info()?;
            println!("Sessions: {}", info.session_count);
            println!("Size:     {} bytes", info.byte_size);
        }
    }

    Ok(())
}

fn find_session<S: KeyValueStore>(store: &SessionStore<S>, id: &str) -> Result<ChatSession> {
    store
        .try_load_sessions()?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| GramcheckError::SessionNotFound(id.to_string()).into())
}

/// Title to show for a session, falling back for untitled ones
pub fn display_title(session: &ChatSession) -> String {
    if session.title.trim().is_empty() {
        "(untitled)".to_string()
    } else {
        session.title.clone()
    }
}

/// Print each message of `session` as `[time] role: content`
pub fn print_messages(session: &ChatSession) {
    if session.messages.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return;
    }

    for message in &session.messages {
        let role = match &message.role {
            MessageRole::User => message.role.to_string().cyan(),
            MessageRole::Assistant => message.role.to_string().green(),
            MessageRole::System => message.role.to_string().yellow(),
            MessageRole::Other(tag) => tag.dimmed(),
        };
        println!(
            "[{}] {}: {}",
            message.timestamp.format("%H:%M"),
            role,
            message.content
        );
    }
}

/// Shorten `s` to at most `max_chars` characters, marking the cut with `...`
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_utils::memory_session_store;

    fn store_with_session(id: &str) -> SessionStore<MemoryStore> {
        let store = memory_session_store();
        store.add_session(ChatSession::with_id(id, "Essay"));
        store
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_display_title_fallback() {
        assert_eq!(display_title(&ChatSession::with_id("s", "  ")), "(untitled)");
        assert_eq!(display_title(&ChatSession::with_id("s", "Memo")), "Memo");
    }

    #[test]
    fn test_rename_missing_session_errors() {
        let store = store_with_session("s1");
        let err = handle_sessions(
            &store,
            SessionCommand::Rename {
                id: "nope".into(),
                title: "X".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Session not found"));
    }

    #[test]
    fn test_add_message_rejects_unknown_role() {
        let store = store_with_session("s1");
        let err = handle_sessions(
            &store,
            SessionCommand::AddMessage {
                id: "s1".into(),
                role: "bot".into(),
                content: "hi".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
        assert!(store.load_sessions()[0].messages.is_empty());
    }

    #[test]
    fn test_add_message_appends() {
        let store = store_with_session("s1");
        handle_sessions(
            &store,
            SessionCommand::AddMessage {
                id: "s1".into(),
                role: "assistant".into(),
                content: "Corrected.".into(),
            },
        )
        .expect("add message");
        let messages = &store.load_sessions()[0].messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::Assistant);
    }

    #[test]
    fn test_use_requires_existing_session() {
        let store = store_with_session("s1");
        assert!(handle_sessions(&store, SessionCommand::Use { id: "ghost".into() }).is_err());
        assert_eq!(store.load_current_session_id(), None);

        handle_sessions(&store, SessionCommand::Use { id: "s1".into() }).expect("use");
        assert_eq!(store.load_current_session_id().as_deref(), Some("s1"));
    }

    #[test]
    fn test_new_with_select_sets_pointer() {
        let store = memory_session_store();
        handle_sessions(
            &store,
            SessionCommand::New {
                title: Some("Draft".into()),
                select: true,
            },
        )
        .expect("new");
        let current = store.current_session().expect("current session");
        assert_eq!(current.title, "Draft");
    }
}
