use crate::client::{AssistantBackend, HttpBackend};
use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::session::{Message, Role, SessionId, SidebarEntry};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle the `history` command
///
/// Lists every conversation the service knows about, or prints one
/// transcript when `session` is given.
pub async fn handle_history(config: &Config, session: Option<String>, json: bool) -> Result<()> {
    let backend = HttpBackend::new(&config.server)?;
    let store = backend.fetch_history().await?;

    match session {
        Some(id) => {
            let id = SessionId::from(id);
            let messages = store
                .get(&id)
                .ok_or_else(|| ScholarError::SessionNotFound(id.to_string()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(messages)?);
            } else {
                print_transcript(messages);
            }
        }
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store)?);
            } else {
                print_sessions(&store.sidebar_entries(None));
                if !store.is_empty() {
                    println!(
                        "Use {} to continue a conversation.",
                        "scholar chat --session <ID>".cyan()
                    );
                    println!();
                }
            }
        }
    }

    Ok(())
}

/// Print sidebar rows as a table; the active session is marked with `*`
pub fn print_sessions(entries: &[SidebarEntry]) {
    if entries.is_empty() {
        println!("{}", "No conversation history found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Messages".bold()
    ]);

    for entry in entries {
        let marker = if entry.active { "*" } else { "" };
        table.add_row(prettytable::row![
            marker.green(),
            entry.id.as_str().cyan(),
            entry.title,
            entry.message_count
        ]);
    }

    println!("\nConversation History:");
    table.printstd();
    println!();
}

/// Print a transcript, one block per message
pub fn print_transcript(messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", "This conversation is empty.".yellow());
        return;
    }

    for message in messages {
        print_message(message);
    }
}

/// Print a single message with a role header; content is shown verbatim
pub fn print_message(message: &Message) {
    let header = match message.role() {
        Role::User => "You".bold().blue(),
        Role::Assistant => "Assistant".bold().green(),
    };
    println!("\n{}\n{}\n", header, message.content());
}
