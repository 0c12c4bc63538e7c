/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes the following command modules:

- `chat`    - Interactive chat mode
- `ask`     - Ask a single question
- `upload`  - Analyze a single document
- `history` - List conversations or print one transcript

The handlers stay thin: every state change goes through the
[`Orchestrator`].
*/

use crate::chat_mode::ChatMode;
use crate::client::{AskOutcome, HttpBackend, UploadOutcome};
use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::orchestrator::{Orchestrator, Submission};
use colored::Colorize;
use std::sync::Arc;

// Conversation listing and transcript rendering
pub mod history;

// Special commands parser for the chat loop
pub mod special_commands;

/// Resolve the mode for a command: the CLI flag wins over the config default
fn resolve_mode(mode: Option<&str>, config: &Config) -> Result<ChatMode> {
    match mode {
        Some(m) => ChatMode::parse_str(m)
            .map_err(|e| ScholarError::Config(format!("--mode: {}", e)).into()),
        None => Ok(config.chat.mode()),
    }
}

/// Build an orchestrator against the configured service and load history
///
/// When `session` is given it becomes the active session.
async fn connect(config: &Config, mode: ChatMode, session: Option<String>) -> Result<Orchestrator> {
    let backend = Arc::new(HttpBackend::new(&config.server)?);
    let mut orchestrator = Orchestrator::new(backend, mode);
    orchestrator.start().await;

    if let Some(id) = session {
        orchestrator.select_session(id)?;
    }
    Ok(orchestrator)
}

/// Text typed alongside a staged file
///
/// The upload takes precedence, so the text is held back for the next prompt
/// instead of being sent.
fn held_back_text(line: &str, file_staged: bool) -> Option<String> {
    let text = line.trim();
    (file_staged && !text.is_empty()).then(|| text.to_string())
}

/// Print the assistant side of a settled ask
fn print_ask_outcome(outcome: &AskOutcome) {
    let message = outcome.to_message();
    match outcome {
        AskOutcome::Answer(_) => history::print_message(&message),
        _ => eprintln!("{}\n", message.content().red()),
    }
}

/// Print the messages a settled upload appended
fn print_upload_outcome(outcome: &UploadOutcome) {
    match outcome {
        UploadOutcome::Analyzed { .. } => {
            for message in outcome.to_messages() {
                history::print_message(&message);
            }
        }
        UploadOutcome::Failed => {
            for message in outcome.to_messages() {
                eprintln!("{}\n", message.content().red());
            }
        }
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Loads the session list, then runs a readline-based loop that submits
    //! input through the orchestrator. Lines starting with `/` are special
    //! commands; a staged file turns the next submit into an upload.

    use super::*;
    use crate::client::UploadFile;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `mode` - Optional override for the configured default mode
    /// * `session` - Optional session to continue instead of a new one
    ///
    /// # Errors
    ///
    /// Returns an error if the mode does not parse, the HTTP client cannot
    /// be built, or the terminal cannot be opened
    pub async fn run_chat(
        config: Config,
        mode: Option<String>,
        session: Option<String>,
    ) -> Result<()> {
        let initial_mode = resolve_mode(mode.as_deref(), &config)?;
        let mut orchestrator = connect(&config, initial_mode, session).await?;
        let mut staged: Option<UploadFile> = None;
        let mut held_back: Option<String> = None;

        let mut rl = DefaultEditor::new().map_err(ScholarError::from)?;

        print_welcome_banner(&orchestrator);
        if config.chat.show_sidebar_on_start {
            history::print_sessions(&orchestrator.sidebar());
        }
        if !orchestrator.transcript().is_empty() {
            history::print_transcript(orchestrator.transcript());
        }

        loop {
            orchestrator.sync_sessions();
            let prompt = match &staged {
                Some(file) => format!(
                    "{}{} ",
                    orchestrator.modes().format_colored_prompt(),
                    format!("[{}]", file.name).magenta()
                ),
                None => orchestrator.modes().format_colored_prompt(),
            };

            let read = match held_back.take() {
                Some(text) => rl.readline_with_initial(&prompt, (text.as_str(), "")),
                None => rl.readline(&prompt),
            };

            match read {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() && staged.is_none() {
                        continue;
                    }
                    if !trimmed.is_empty() {
                        let _ = rl.add_history_entry(trimmed);
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::SwitchMode(mode) => {
                            let old = orchestrator.select_mode(mode);
                            println!(
                                "Switched from {} to {} mode\n",
                                old.colored_tag(),
                                mode.colored_tag()
                            );
                        }
                        SpecialCommand::ListModes => print_modes(orchestrator.mode()),
                        SpecialCommand::NewChat => match orchestrator.new_chat() {
                            Ok(id) => {
                                staged = None;
                                println!("{} {}\n", "Started new chat".green(), id);
                            }
                            Err(e) => eprintln!("{}\n", e.to_string().red()),
                        },
                        SpecialCommand::ListSessions => {
                            orchestrator.sync_sessions();
                            history::print_sessions(&orchestrator.sidebar());
                        }
                        SpecialCommand::OpenSession(id) => {
                            if !orchestrator.sessions().contains(&id.as_str().into()) {
                                println!(
                                    "{}",
                                    format!("No stored messages for {}; starting it empty", id)
                                        .yellow()
                                );
                            }
                            match orchestrator.select_session(id) {
                                Ok(()) => history::print_transcript(orchestrator.transcript()),
                                Err(e) => eprintln!("{}\n", e.to_string().red()),
                            }
                        }
                        SpecialCommand::Attach(path) => {
                            match UploadFile::from_path(&path).await {
                                Ok(file) => {
                                    println!(
                                        "Staged {} ({} bytes). Press Enter to upload, /detach to cancel.\n",
                                        file.name.cyan(),
                                        file.bytes.len()
                                    );
                                    staged = Some(file);
                                }
                                Err(e) => eprintln!(
                                    "{}\n",
                                    format!("Cannot attach {}: {:#}", path.display(), e).red()
                                ),
                            }
                        }
                        SpecialCommand::Detach => match staged.take() {
                            Some(file) => println!("Dropped {}\n", file.name),
                            None => println!("No file staged\n"),
                        },
                        SpecialCommand::ShowStatus => {
                            print_status_display(&orchestrator, staged.as_ref())
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            held_back = held_back_text(&line, staged.is_some());
                            if held_back.is_some() {
                                println!(
                                    "{}",
                                    "Text kept for the next prompt; only the file is sent"
                                        .yellow()
                                );
                            }
                            match orchestrator.submit(&line, staged.take()).await {
                                Ok(Submission::Asked(outcome)) => print_ask_outcome(&outcome),
                                Ok(Submission::Uploaded(outcome)) => {
                                    print_upload_outcome(&outcome)
                                }
                                Err(e) => eprintln!("{}\n", e.to_string().red()),
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        // Let the last refresh land so its failure, if any, is logged
        orchestrator.settle_sessions().await;
        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(orchestrator: &Orchestrator) {
        let mode = orchestrator.mode();
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║            Scholar Interactive Chat - Welcome!               ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Mode:    {} ({})", mode.colored_tag(), mode.description());
        println!("Session: {}", orchestrator.current_session());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status_display(orchestrator: &Orchestrator, staged: Option<&UploadFile>) {
        let mode = orchestrator.mode();
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Scholar Session Status                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Mode:              {} ({})", mode.colored_tag(), mode.description());
        println!("Session:           {}", orchestrator.current_session());
        println!(
            "Conversation Size: {} messages",
            orchestrator.transcript().len()
        );
        println!("Known Sessions:    {}", orchestrator.sessions().len());
        if orchestrator.refresh_pending() {
            println!("Sidebar:           {}", "refresh pending".yellow());
        }
        match staged {
            Some(file) => println!("Staged File:       {} ({})", file.name, file.content_type),
            None => println!("Staged File:       none"),
        }
        println!();
    }

    fn print_modes(current: ChatMode) {
        println!();
        for mode in ChatMode::ALL {
            let marker = if mode == current { "*" } else { " " };
            println!(
                "{} {:<20} {}",
                marker.green(),
                mode.as_str(),
                mode.description()
            );
        }
        println!();
    }
}

// Single question handler
pub mod ask {
    use super::*;

    /// Ask one question and print the answer
    ///
    /// # Errors
    ///
    /// Returns an error when the question is blank or the service did not
    /// produce an answer
    pub async fn run_ask(
        config: Config,
        question: String,
        mode: Option<String>,
        session: Option<String>,
    ) -> Result<()> {
        let mode = resolve_mode(mode.as_deref(), &config)?;
        let mut orchestrator = connect(&config, mode, session).await?;

        let outcome = orchestrator.send_query(&question).await?;
        print_ask_outcome(&outcome);
        orchestrator.settle_sessions().await;

        if outcome.is_answer() {
            println!("Session: {}", orchestrator.current_session());
            Ok(())
        } else {
            anyhow::bail!("Question was not answered")
        }
    }
}

// Single document handler
pub mod upload {
    use super::*;
    use crate::client::UploadFile;
    use std::path::PathBuf;

    /// Upload one document and print its analysis
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the service could
    /// not analyze it
    pub async fn run_upload(config: Config, path: PathBuf, session: Option<String>) -> Result<()> {
        let file = UploadFile::from_path(&path).await?;
        let mut orchestrator = connect(&config, config.chat.mode(), session).await?;

        let outcome = orchestrator.upload_file(file).await?;
        print_upload_outcome(&outcome);

        match outcome {
            UploadOutcome::Analyzed { .. } => {
                println!("Session: {}", orchestrator.current_session());
                Ok(())
            }
            UploadOutcome::Failed => Err(ScholarError::Upload(format!(
                "{} was not analyzed",
                path.display()
            ))
            .into()),
        }
    }
}
