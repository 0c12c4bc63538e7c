//! Assistant service client abstraction and implementations
//!
//! This module defines the [`AssistantBackend`] trait covering the three calls
//! the orchestration layer makes. Concrete implementations live in
//! submodules:
//!
//! - [`http::HttpBackend`] -- JSON/multipart over HTTP with `reqwest`.
//! - `fake::FakeBackend` -- scripted in-process backend used in tests
//!   (cfg(test) only).
//!
//! # Design
//!
//! Backend methods return `Err` for anything that prevented a well-formed
//! response from arriving: connection failures, non-success statuses, and
//! undecodable bodies. Interpreting a decoded payload (for example an
//! `error` field in an ask reply) is left to the caller through
//! [`AskOutcome::from_reply`].

use async_trait::async_trait;

use crate::error::Result;
use crate::session::SessionStore;

pub mod http;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use http::HttpBackend;
pub use types::{
    AskOutcome, AskReply, AskRequest, UploadFile, UploadOutcome, UploadReply,
    CONNECTION_ERROR_MESSAGE, UPLOAD_FAILED_MESSAGE,
};

/// The external answering, document-analysis and history services
///
/// Used polymorphically through `Arc<dyn AssistantBackend>` so the same
/// orchestrator drives the HTTP client in production and a fake in tests.
#[async_trait]
pub trait AssistantBackend: Send + Sync + std::fmt::Debug {
    /// Fetch the full session id to transcript mapping (`GET /history`)
    async fn fetch_history(&self) -> Result<SessionStore>;

    /// Ask a question within a session (`POST /ask`)
    async fn ask(&self, request: &AskRequest) -> Result<AskReply>;

    /// Upload a document for analysis (`POST /upload`)
    async fn upload(&self, file: &UploadFile) -> Result<UploadReply>;
}
