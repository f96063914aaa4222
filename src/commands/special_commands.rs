//! Special commands parser for interactive chat
//!
//! Special commands act on the session instead of being sent as questions:
//! clearing or showing the history, printing status and help, and leaving.
//!
//! Commands are prefixed with `/` and are case-insensitive. The bare words
//! `exit` and `quit` also leave the session.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Forget the conversation so far
    Clear,

    /// Re-print every turn of the conversation
    History,

    /// Show turn count, gate state, and candidate models
    ShowStatus,

    /// Display help information
    Help,

    /// End the session
    Exit,

    /// Not a special command; treat as a question
    None,
}

/// Parse user input into a special command
///
/// # Examples
///
/// ```
/// use scopechat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/CLEAR").unwrap(), SpecialCommand::Clear);
/// assert_eq!(parse_special_command("quit").unwrap(), SpecialCommand::Exit);
/// assert_eq!(
///     parse_special_command("Kaj je pametni dom?").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/clear" | "/reset" => Ok(SpecialCommand::Clear),
        "/history" => Ok(SpecialCommand::History),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the special command reference
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

  /clear, /reset  - Forget the conversation so far
  /history        - Show the conversation so far
  /status         - Show turn count, domain gate, and candidate models
  /help, /?       - Show this help
  exit, quit      - Leave the session (also /exit, /quit)

Anything else is sent as a question. Questions that do not mention the
configured topic are answered with a refusal.
"#
    );
}
