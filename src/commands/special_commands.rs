//! Special commands parser for interactive chat mode
//!
//! This module parses and handles special commands that can be entered during
//! interactive chat sessions. Special commands allow users to:
//! - Switch the answer mode
//! - Start a new chat or reopen an earlier one
//! - Stage a document for analysis
//! - View status and help
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Arguments that
//! name a session or a file keep their original case.

use crate::chat_mode::ChatMode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands change the chat state or print information instead of
/// being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch the answer mode for subsequent questions
    SwitchMode(ChatMode),

    /// List the available modes
    ListModes,

    /// Start a fresh, empty chat
    NewChat,

    /// List earlier conversations, newest first
    ListSessions,

    /// Reopen an earlier conversation by id
    OpenSession(String),

    /// Stage a file; the next submit uploads it instead of asking
    Attach(PathBuf),

    /// Drop the staged file
    Detach,

    /// Display current mode, session and staged file
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be submitted as a regular question.
    None,
}

/// Return the argument following `command`, keeping its original case
fn argument<'a>(original: &'a str, command: &str) -> &'a str {
    original
        .get(command.len()..)
        .map(str::trim)
        .unwrap_or_default()
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use scholar::commands::special_commands::{parse_special_command, SpecialCommand};
/// use scholar::chat_mode::ChatMode;
///
/// let cmd = parse_special_command("/mode research").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchMode(ChatMode::Research));
///
/// let cmd = parse_special_command("/open session_1712").unwrap();
/// assert_eq!(cmd, SpecialCommand::OpenSession("session_1712".to_string()));
///
/// let cmd = parse_special_command("what is a monad?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        // Mode switching
        "/mode" => Err(CommandError::MissingArgument {
            command: "/mode".to_string(),
            usage: "/mode <exam|research|programming|short_notes|concept_breakdown|auto>"
                .to_string(),
        }),
        input if input.starts_with("/mode ") => {
            let arg = input[6..].trim();
            ChatMode::parse_str(arg)
                .map(SpecialCommand::SwitchMode)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/mode".to_string(),
                    arg: arg.to_string(),
                })
        }
        "/exam" => Ok(SpecialCommand::SwitchMode(ChatMode::Exam)),
        "/research" => Ok(SpecialCommand::SwitchMode(ChatMode::Research)),
        "/coding" => Ok(SpecialCommand::SwitchMode(ChatMode::Programming)),
        "/notes" => Ok(SpecialCommand::SwitchMode(ChatMode::ShortNotes)),
        "/concepts" => Ok(SpecialCommand::SwitchMode(ChatMode::ConceptBreakdown)),
        "/auto" => Ok(SpecialCommand::SwitchMode(ChatMode::Auto)),
        "/modes" => Ok(SpecialCommand::ListModes),

        // Sessions
        "/new" => Ok(SpecialCommand::NewChat),
        "/sessions" | "/history" => Ok(SpecialCommand::ListSessions),
        "/open" => Err(CommandError::MissingArgument {
            command: "/open".to_string(),
            usage: "/open <session_id>".to_string(),
        }),
        input if input.starts_with("/open ") => Ok(SpecialCommand::OpenSession(
            argument(trimmed, "/open").to_string(),
        )),

        // Staged files
        "/attach" => Err(CommandError::MissingArgument {
            command: "/attach".to_string(),
            usage: "/attach <path to .pdf or .docx>".to_string(),
        }),
        input if input.starts_with("/attach ") => Ok(SpecialCommand::Attach(PathBuf::from(
            argument(trimmed, "/attach"),
        ))),
        "/detach" => Ok(SpecialCommand::Detach),

        // Status and help
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        // Exit commands
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        // Unknown command starting with "/"
        input if input.starts_with('/') => {
            let cmd = input.split_whitespace().next().unwrap_or(input);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }

        // Not a special command
        _ => Ok(SpecialCommand::None),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

ANSWER MODES:
  /mode <mode>    - Switch mode (exam, research, programming,
                    short_notes, concept_breakdown, auto)
  /exam /research /coding /notes /concepts /auto
                  - Shorthands for /mode
  /modes          - List modes with descriptions

CONVERSATIONS:
  /new            - Start a new chat
  /sessions       - List earlier chats, newest first
  /open <id>      - Reopen an earlier chat

DOCUMENTS:
  /attach <path>  - Stage a PDF or DOCX; press Enter to upload it
  /detach         - Drop the staged file

OTHER:
  /status         - Show mode, session and staged file
  /help           - Show this help message
  exit, quit      - Leave the chat
"#
    );
}
