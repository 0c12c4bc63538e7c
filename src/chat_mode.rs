//! Chat mode types and utilities
//!
//! A chat mode selects which processing pipeline the assistant service routes
//! a question through. The set of modes is closed:
//! - Exam: answers shaped for exam preparation (default)
//! - Research: longer, sourced explanations
//! - Programming: code-oriented answers
//! - Short notes: condensed revision notes
//! - Concept breakdown: step-by-step explanation of one concept
//! - Auto: let the service pick
//!
//! The selected mode is read when a query is sent; switching modes never
//! touches messages that were already sent.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing pipeline requested for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Exam preparation answers
    #[default]
    Exam,
    /// Research-style explanations
    Research,
    /// Programming help
    Programming,
    /// Condensed revision notes
    ShortNotes,
    /// Step-by-step concept explanations
    ConceptBreakdown,
    /// Service-selected pipeline
    Auto,
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ChatMode {
    /// Every mode, in the order the mode bar lists them
    pub const ALL: [ChatMode; 6] = [
        Self::Exam,
        Self::Research,
        Self::Programming,
        Self::ShortNotes,
        Self::ConceptBreakdown,
        Self::Auto,
    ];

    /// Wire name sent to the assistant service
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::chat_mode::ChatMode;
    ///
    /// assert_eq!(ChatMode::ShortNotes.as_str(), "short_notes");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Research => "research",
            Self::Programming => "programming",
            Self::ShortNotes => "short_notes",
            Self::ConceptBreakdown => "concept_breakdown",
            Self::Auto => "auto",
        }
    }

    /// Parse a chat mode from a string
    ///
    /// Accepts the wire names as well as the short labels shown in the mode
    /// bar, case-insensitively.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the mode
    ///
    /// # Returns
    ///
    /// Returns the parsed ChatMode or an error if the string is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::chat_mode::ChatMode;
    ///
    /// assert_eq!(ChatMode::parse_str("coding").unwrap(), ChatMode::Programming);
    /// assert_eq!(ChatMode::parse_str("concept_breakdown").unwrap(), ChatMode::ConceptBreakdown);
    /// assert!(ChatMode::parse_str("poetry").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "exam" => Ok(Self::Exam),
            "research" => Ok(Self::Research),
            "programming" | "coding" => Ok(Self::Programming),
            "short_notes" | "notes" => Ok(Self::ShortNotes),
            "concept_breakdown" | "concepts" => Ok(Self::ConceptBreakdown),
            "auto" => Ok(Self::Auto),
            other => Err(format!("Unknown chat mode: {}", other)),
        }
    }

    /// Short label used in the mode bar
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exam => "Exam",
            Self::Research => "Research",
            Self::Programming => "Coding",
            Self::ShortNotes => "Notes",
            Self::ConceptBreakdown => "Concepts",
            Self::Auto => "Auto",
        }
    }

    /// Get a user-friendly description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Self::Exam => "Exam-focused answers with key points",
            Self::Research => "In-depth explanations with background",
            Self::Programming => "Code-oriented help and examples",
            Self::ShortNotes => "Condensed notes for quick revision",
            Self::ConceptBreakdown => "Step-by-step breakdown of a concept",
            Self::Auto => "Let the assistant choose the best approach",
        }
    }

    /// Get a colored tag representation of this mode
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use scholar::chat_mode::ChatMode;
    ///
    /// println!("{}", ChatMode::Exam.colored_tag()); // "[Exam]" in orange-ish yellow
    /// ```
    pub fn colored_tag(&self) -> String {
        let label = self.label();
        let colored = match self {
            Self::Exam => label.bright_red(),
            Self::Research => label.purple(),
            Self::Programming => label.green(),
            Self::ShortNotes => label.blue(),
            Self::ConceptBreakdown => label.magenta(),
            Self::Auto => label.yellow(),
        };
        format!("[{}]", colored)
    }
}

/// Currently selected chat mode
///
/// Selection is unconditional: the enumeration is closed, so any value is a
/// valid transition.
#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    current: ChatMode,
}

impl ModeSelector {
    /// Create a selector starting at `initial`
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::chat_mode::{ChatMode, ModeSelector};
    ///
    /// let selector = ModeSelector::new(ChatMode::Research);
    /// assert_eq!(selector.current(), ChatMode::Research);
    /// assert_eq!(ModeSelector::default().current(), ChatMode::Exam);
    /// ```
    pub fn new(initial: ChatMode) -> Self {
        Self { current: initial }
    }

    /// The mode that the next query will be sent with
    pub fn current(&self) -> ChatMode {
        self.current
    }

    /// Switch to a new chat mode
    ///
    /// # Returns
    ///
    /// The old chat mode that was replaced
    pub fn select(&mut self, mode: ChatMode) -> ChatMode {
        let old = self.current;
        self.current = mode;
        if old != mode {
            tracing::debug!(from = %old, to = %mode, "Chat mode switched");
        }
        old
    }

    /// Format a prompt string with a colored mode indicator
    pub fn format_colored_prompt(&self) -> String {
        format!("{} >> ", self.current.colored_tag())
    }
}
