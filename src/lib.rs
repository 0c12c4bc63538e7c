//! Scholar - study assistant client library
//!
//! This library provides the conversation layer of a study-assistant front
//! end: the session model, the request dispatcher that talks to the
//! assistant service, history synchronization for the sidebar, and the
//! orchestrator that ties them together.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Messages, session ids, the session store and history refresh
//! - `client`: Backend abstraction and the HTTP implementation
//! - `chat_mode`: Answer modes and the mode selector
//! - `orchestrator`: Conversation state, request dispatch and orchestration
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Command handlers used by the binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scholar::client::HttpBackend;
//! use scholar::{ChatMode, Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let backend = Arc::new(HttpBackend::new(&config.server)?);
//!     let mut orchestrator = Orchestrator::new(backend, ChatMode::Exam);
//!     orchestrator.start().await;
//!     orchestrator.send_query("Explain Dijkstra's algorithm").await?;
//!     Ok(())
//! }
//! ```

pub mod chat_mode;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod session;

// Re-export commonly used types
pub use chat_mode::{ChatMode, ModeSelector};
pub use config::Config;
pub use error::{Result, ScholarError};
pub use orchestrator::Orchestrator;
pub use session::{Message, SessionId, SessionStore};

#[cfg(test)]
pub mod test_utils;
