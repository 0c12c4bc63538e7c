//! Command-line interface definition for Scholar
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, file
//! analysis, and browsing conversation history.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scholar - study assistant client
///
/// Chat with a study assistant service, upload course material for
/// analysis, and revisit earlier conversations.
#[derive(Parser, Debug, Clone)]
#[command(name = "scholar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the assistant service address
    #[arg(long)]
    pub base_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Scholar
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Chat mode (exam, research, programming, short_notes, concept_breakdown, auto)
        #[arg(short, long)]
        mode: Option<String>,

        /// Continue an existing session instead of starting a new one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        /// Chat mode for this question
        #[arg(short, long)]
        mode: Option<String>,

        /// Session to ask in (a new one is started if omitted)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Upload a PDF or DOCX file for analysis
    Upload {
        /// File to analyze
        path: PathBuf,

        /// Session the analysis belongs to (a new one is started if omitted)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List conversations or show one transcript
    History {
        /// Show the transcript of this session instead of the list
        #[arg(short, long)]
        session: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
