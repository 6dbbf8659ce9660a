//! Interactive chat mode handler.
//!
//! Runs a readline loop over one session. Plain lines accumulate into a
//! draft; `/check`, `/clear` and `/settings` are dispatched through an
//! [`ActionMenu`] whose handlers act on the session store.

use crate::action_menu::{ActionMenu, MenuAction};
use crate::commands::sessions::{display_title, print_messages};
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{GramcheckError, Result};
use crate::storage::{
    ChatMessage, ChatSession, KeyValueStore, PersistOutcome, SessionPatch, SessionStore,
};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;

/// Mutable state shared between the loop and the menu handlers
#[derive(Debug, Default)]
pub struct ChatState {
    /// Session the chat writes to
    pub session_id: String,
    /// Text typed since the last check
    pub draft: String,
}

impl ChatState {
    /// Append a line to the draft
    pub fn push_line(&mut self, line: &str) {
        if !self.draft.is_empty() {
            self.draft.push('\n');
        }
        self.draft.push_str(line);
    }

    /// Whether the draft has anything worth checking
    pub fn has_draft(&self) -> bool {
        !self.draft.trim().is_empty()
    }
}

/// Pick the session to chat in
///
/// An explicit `requested` id must exist. Otherwise the current session is
/// reused, or a new one is created. The chosen session becomes current; the
/// outcome of recording it is returned alongside.
pub fn resolve_session<S: KeyValueStore>(
    store: &SessionStore<S>,
    requested: Option<String>,
) -> Result<(ChatSession, PersistOutcome)> {
    let session = match requested {
        Some(id) => store
            .get_session(&id)
            .ok_or(GramcheckError::SessionNotFound(id))?,
        None => match store.current_session() {
            Some(session) => session,
            None => {
                let session = ChatSession::new("");
                store.try_add_session(session.clone())?;
                tracing::info!(session_id = %session.id, "Created new chat session");
                session
            }
        },
    };

    let outcome = store.save_current_session_id(Some(&session.id));
    Ok((session, outcome))
}

/// Submit the draft as a user message and reset it
///
/// Returns the outcome of the write; the draft is kept if the write fails.
pub fn submit_draft<S: KeyValueStore>(
    store: &SessionStore<S>,
    state: &RefCell<ChatState>,
) -> PersistOutcome {
    let mut state = state.borrow_mut();
    let text = state.draft.trim().to_string();
    let outcome = store.add_message(&state.session_id, ChatMessage::user(text));
    if outcome.is_persisted() {
        state.draft.clear();
    }
    outcome
}

/// Drop every message of the session and the pending draft
pub fn clear_session<S: KeyValueStore>(
    store: &SessionStore<S>,
    state: &RefCell<ChatState>,
) -> PersistOutcome {
    let mut state = state.borrow_mut();
    state.draft.clear();
    store.update_session(&state.session_id, SessionPatch::messages(Vec::new()))
}

fn report(action: MenuAction, outcome: PersistOutcome) {
    match outcome {
        PersistOutcome::Persisted => println!("{}", format!("{} done.", action).green()),
        PersistOutcome::Unchanged => println!("{}", "The session no longer exists.".yellow()),
        PersistOutcome::Failed => println!(
            "{}",
            format!("{} could not be saved; storage is unavailable.", action).red()
        ),
    }
}

fn print_settings(config: &Config) {
    println!("\n{}", "Settings".bold());
    match serde_yaml::to_string(config) {
        Ok(yaml) => println!("{}", yaml),
        Err(e) => println!("{}", format!("Failed to render settings: {}", e).red()),
    }
}

fn print_menu(menu: &ActionMenu<'_>) {
    for (i, action) in MenuAction::ALL.iter().enumerate() {
        let label = format!("  {}. {}", i + 1, action);
        if menu.is_enabled(*action) {
            println!("{}", label.cyan());
        } else {
            println!("{}", label.dimmed());
        }
    }
}

fn print_welcome_banner(session: &ChatSession) {
    println!(
        "\n{} {} {}",
        "Gramcheck chat".bold(),
        display_title(session),
        format!("({})", session.id).dimmed()
    );
    println!(
        "Type text to draft, {} to submit, {} for commands.\n",
        "/check".cyan(),
        "/help".cyan()
    );
}

/// Start interactive chat mode
///
/// # Errors
///
/// Fails if the requested session does not exist, a new session cannot be
/// stored, or the terminal cannot be read.
pub fn run_chat<S: KeyValueStore>(
    store: &SessionStore<S>,
    config: &Config,
    session: Option<String>,
) -> Result<()> {
    tracing::info!("Starting interactive chat mode");

    let (session, selected) = resolve_session(store, session)?;
    print_welcome_banner(&session);
    if selected == PersistOutcome::Failed {
        println!(
            "{}",
            "Could not remember this session as current; storage is unavailable.".red()
        );
    }

    let state = RefCell::new(ChatState {
        session_id: session.id.clone(),
        draft: String::new(),
    });

    let mut menu = ActionMenu::new(
        || report(MenuAction::Check, submit_draft(store, &state)),
        || report(MenuAction::Clear, clear_session(store, &state)),
        || print_settings(config),
    );

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = if menu.is_open() { "menu> " } else { ">> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let has_draft = state.borrow().has_draft();
                menu.set_can_check(has_draft);

                if menu.is_open() {
                    if let Ok(choice) = trimmed.parse::<usize>() {
                        match MenuAction::ALL.get(choice.wrapping_sub(1)) {
                            Some(action) => {
                                if !menu.trigger(*action) {
                                    println!("{}", "Nothing to check yet.".yellow());
                                }
                            }
                            None => println!("{}", "Pick 1, 2 or 3.".yellow()),
                        }
                        continue;
                    }
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::Action(action)) => {
                        if !menu.trigger(action) {
                            println!("{}", "Nothing to check yet.".yellow());
                        }
                    }
                    Ok(SpecialCommand::ToggleMenu) => {
                        if menu.toggle() {
                            print_menu(&menu);
                        }
                    }
                    Ok(SpecialCommand::History) => {
                        let id = state.borrow().session_id.clone();
                        match store.get_session(&id) {
                            Some(session) => print_messages(&session),
                            None => println!("{}", "The session no longer exists.".yellow()),
                        }
                    }
                    Ok(SpecialCommand::Help) => print_help(),
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::None) => {
                        menu.close();
                        state.borrow_mut().push_line(trimmed);
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if state.borrow().has_draft() {
        println!("{}", "Unsent draft discarded.".yellow());
    }

    Ok(())
}
