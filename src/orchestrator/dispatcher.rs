//! Request dispatch
//!
//! Issues the single outstanding ask or upload and folds its outcome back
//! into [`ConversationState`]. Every request is a two-phase commit:
//!
//! 1. a synchronous local transition (optimistic echo, enter Busy);
//! 2. the network round trip, settling into exactly one of the outcome
//!    variants, followed by the settling transition (append, leave Busy).
//!
//! Phase 2 always runs once phase 1 succeeded, whatever the backend does,
//! including panicking, so the state never stays Busy after a request ends.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::chat_mode::ChatMode;
use crate::client::{AskOutcome, AskRequest, AssistantBackend, UploadFile, UploadOutcome};
use crate::error::Result;
use crate::orchestrator::state::{reduce, Action, ConversationState, Effect};

/// Outcome of a dispatched request together with the follow-up it requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T> {
    pub outcome: T,
    pub effects: Vec<Effect>,
}

/// Sole writer of the transcript while a request is in flight
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    backend: Arc<dyn AssistantBackend>,
}

impl RequestDispatcher {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self { backend }
    }

    /// Ask `content` in the active session
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScholarError::Busy`] or
    /// [`crate::error::ScholarError::EmptyQuery`] before any network call.
    /// Backend failures are not errors; they settle into [`AskOutcome`].
    pub async fn send_query(
        &self,
        state: &mut ConversationState,
        content: &str,
        mode: ChatMode,
    ) -> Result<Settled<AskOutcome>> {
        reduce(state, Action::QuerySubmitted(content.to_string()))?;

        let request = AskRequest {
            question: content.to_string(),
            session_id: state.current_session().clone(),
            mode,
        };
        tracing::info!(session_id = %request.session_id, %mode, "Asking question");

        let backend = Arc::clone(&self.backend);
        let result = AssertUnwindSafe(async move { backend.ask(&request).await })
            .catch_unwind()
            .await;
        let outcome = match result {
            Ok(Ok(reply)) => AskOutcome::from_reply(reply),
            Ok(Err(e)) => {
                tracing::warn!("Ask request failed: {:#}", e);
                AskOutcome::TransportError
            }
            Err(_) => {
                tracing::error!("Ask request panicked");
                AskOutcome::TransportError
            }
        };

        let effects = reduce(state, Action::QuerySettled(outcome.clone()))?;
        Ok(Settled { outcome, effects })
    }

    /// Upload `file` for analysis
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScholarError::Busy`] before any network call.
    /// Backend failures settle into [`UploadOutcome::Failed`].
    pub async fn upload_file(
        &self,
        state: &mut ConversationState,
        file: UploadFile,
    ) -> Result<Settled<UploadOutcome>> {
        reduce(state, Action::UploadStarted)?;
        tracing::info!(file = %file.name, "Uploading file for analysis");

        let backend = Arc::clone(&self.backend);
        let name = file.name.clone();
        let result = AssertUnwindSafe(async move { backend.upload(&file).await })
            .catch_unwind()
            .await;
        let outcome = match result {
            Ok(Ok(reply)) => UploadOutcome::analyzed(name, reply),
            Ok(Err(e)) => {
                tracing::warn!("Upload failed: {:#}", e);
                UploadOutcome::Failed
            }
            Err(_) => {
                tracing::error!("Upload panicked");
                UploadOutcome::Failed
            }
        };

        let effects = reduce(state, Action::UploadSettled(outcome.clone()))?;
        Ok(Settled { outcome, effects })
    }
}
