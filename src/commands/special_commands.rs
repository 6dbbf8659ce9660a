//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` are commands rather than draft text. They are
//! case-insensitive. `/check`, `/clear` and `/settings` are dispatched
//! through the action menu; the rest control the chat loop itself.

use crate::action_menu::MenuAction;
use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command does not take an argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },
}

/// Commands recognised in the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Dispatch a menu action
    Action(MenuAction),
    /// Expand or collapse the action menu
    ToggleMenu,
    /// Print the messages of the current session
    History,
    /// Display help information
    Help,
    /// Leave the chat loop
    Exit,
    /// Not a command; the line is draft text
    None,
}

/// Parse one input line
///
/// # Errors
///
/// Returns `CommandError` for an unknown `/command` or an unexpected
/// argument.
///
/// # Examples
///
/// ```
/// use gramcheck::action_menu::MenuAction;
/// use gramcheck::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(
///     parse_special_command("/CHECK").unwrap(),
///     SpecialCommand::Action(MenuAction::Check)
/// );
/// assert_eq!(parse_special_command("Me and him went.").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let parsed = match command.as_str() {
        "/check" => SpecialCommand::Action(MenuAction::Check),
        "/clear" => SpecialCommand::Action(MenuAction::Clear),
        "/settings" => SpecialCommand::Action(MenuAction::Settings),
        "/menu" => SpecialCommand::ToggleMenu,
        "/history" => SpecialCommand::History,
        "/help" | "/?" => SpecialCommand::Help,
        "/exit" | "/quit" => SpecialCommand::Exit,
        _ => return Err(CommandError::UnknownCommand(command)),
    };

    if let Some(arg) = arg {
        return Err(CommandError::UnsupportedArgument {
            command,
            arg: arg.to_string(),
        });
    }

    Ok(parsed)
}

/// Print the list of special commands
pub fn print_help() {
    println!("\n{}", "Chat commands".bold());
    println!("  {}      submit the draft for grammar checking", "/check".cyan());
    println!("  {}      clear the messages of the current session", "/clear".cyan());
    println!("  {}   show the effective settings", "/settings".cyan());
    println!("  {}       toggle the action menu (then pick 1-3)", "/menu".cyan());
    println!("  {}    show the messages of the current session", "/history".cyan());
    println!("  {}       show this help", "/help".cyan());
    println!("  {}       leave the chat", "/exit".cyan());
    println!("\nAny other line is appended to the draft.\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu_actions() {
        assert_eq!(
            parse_special_command("/check").unwrap(),
            SpecialCommand::Action(MenuAction::Check)
        );
        assert_eq!(
            parse_special_command("/Clear").unwrap(),
            SpecialCommand::Action(MenuAction::Clear)
        );
        assert_eq!(
            parse_special_command("  /settings  ").unwrap(),
            SpecialCommand::Action(MenuAction::Settings)
        );
    }

    #[test]
    fn test_parse_loop_commands() {
        assert_eq!(parse_special_command("/menu").unwrap(), SpecialCommand::ToggleMenu);
        assert_eq!(parse_special_command("/history").unwrap(), SpecialCommand::History);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/quit").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(
            parse_special_command("i has a apple").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_special_command("/frobnicate"),
            Err(CommandError::UnknownCommand("/frobnicate".to_string()))
        );
    }

    #[test]
    fn test_unexpected_argument() {
        let err = parse_special_command("/clear everything").unwrap_err();
        assert_eq!(
            err,
            CommandError::UnsupportedArgument {
                command: "/clear".to_string(),
                arg: "everything".to_string(),
            }
        );
    }
}
