//! Error types for Scholar
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.
//!
//! Recovered failures (an unreachable backend, an `error` field in an
//! answer payload, a rejected upload) are not errors: they settle into
//! [`crate::client::AskOutcome`] and [`crate::client::UploadOutcome`]
//! values and become assistant messages. The variants below describe
//! precondition violations and failures of the surrounding tooling.

use thiserror::Error;

/// Main error type for Scholar operations
#[derive(Error, Debug)]
pub enum ScholarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend could not be reached or answered with a failure status
    #[error("Transport error: {0}")]
    Transport(String),

    /// A query was submitted with blank content and no staged file
    #[error("Cannot send an empty query")]
    EmptyQuery,

    /// Another ask or upload is still in flight
    #[error("A request is already in flight")]
    Busy,

    /// A settle arrived for a request that is not the one in flight
    #[error("No {0:?} request is in flight")]
    NotInFlight(crate::orchestrator::Pending),

    /// A session id was requested that the history does not contain
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A file could not be prepared for upload
    #[error("Upload error: {0}")]
    Upload(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors from the interactive prompt
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Scholar operations
///
/// Uses `anyhow::Error` so callers can attach context while still being able
/// to `downcast_ref::<ScholarError>()` on precondition failures.
pub type Result<T> = anyhow::Result<T>;
