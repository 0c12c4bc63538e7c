//! Conversation orchestration
//!
//! [`Orchestrator`] composes the mode selector, the request dispatcher and the
//! session synchronizer into the operations a front end drives: switching
//! sessions, starting a new chat, asking, uploading, and submitting whatever
//! the input box currently holds.
//!
//! # Control flow
//!
//! ```text
//! user action -> ModeSelector (mode) -> RequestDispatcher (network)
//!             -> reduce (state) -> SessionSynchronizer (sidebar)
//! ```
//!
//! The orchestrator is driven through `&mut self`, so there is exactly one
//! logical thread of control. Background history refreshes run on their own
//! tasks and are folded back in by [`Orchestrator::sync_sessions`] and
//! [`Orchestrator::settle_sessions`].

pub mod dispatcher;
pub mod state;

pub use dispatcher::{RequestDispatcher, Settled};
pub use state::{reduce, Action, BusyState, ConversationState, Effect, Pending};

use std::sync::Arc;

use crate::chat_mode::{ChatMode, ModeSelector};
use crate::client::{AskOutcome, AssistantBackend, UploadFile, UploadOutcome};
use crate::error::Result;
use crate::session::{Message, SessionId, SessionStore, SessionSynchronizer, SidebarEntry};

/// What [`Orchestrator::submit`] ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Asked(AskOutcome),
    Uploaded(UploadOutcome),
}

/// Top-level coordinator of a conversation front end
#[derive(Debug)]
pub struct Orchestrator {
    state: ConversationState,
    modes: ModeSelector,
    dispatcher: RequestDispatcher,
    sync: SessionSynchronizer,
}

impl Orchestrator {
    /// Create an orchestrator pointing at a freshly minted session
    ///
    /// Nothing is fetched until [`Orchestrator::start`] is awaited.
    pub fn new(backend: Arc<dyn AssistantBackend>, initial_mode: ChatMode) -> Self {
        Self {
            state: ConversationState::new(SessionId::mint()),
            modes: ModeSelector::new(initial_mode),
            dispatcher: RequestDispatcher::new(Arc::clone(&backend)),
            sync: SessionSynchronizer::new(backend),
        }
    }

    /// Load the session list for the sidebar
    ///
    /// A failed fetch is logged and leaves the list empty.
    pub async fn start(&mut self) {
        tracing::info!(session_id = %self.state.current_session(), "Starting conversation");
        if let Some(store) = self.sync.refresh_now().await {
            self.load_history(store);
        }
    }

    fn load_history(&mut self, store: SessionStore) {
        tracing::debug!(sessions = store.len(), "Applying history");
        // HistoryLoaded is accepted in every state
        let _ = reduce(&mut self.state, Action::HistoryLoaded(store));
    }

    fn run_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::RefreshHistory => self.sync.spawn_refresh(),
            }
        }
    }

    /// Fold in background refreshes that already completed
    ///
    /// Returns true when the session list changed.
    pub fn sync_sessions(&mut self) -> bool {
        match self.sync.take_latest() {
            Some(store) => {
                self.load_history(store);
                true
            }
            None => false,
        }
    }

    /// Wait for background refreshes and fold in the newest one
    pub async fn settle_sessions(&mut self) -> bool {
        match self.sync.settle().await {
            Some(store) => {
                self.load_history(store);
                true
            }
            None => false,
        }
    }

    /// Make `id` the active session and show its stored transcript
    ///
    /// An id missing from the history shows an empty transcript.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScholarError::Busy`] while a request is in flight.
    pub fn select_session(&mut self, id: impl Into<SessionId>) -> Result<()> {
        self.sync_sessions();
        let id = id.into();
        tracing::debug!(session_id = %id, "Selecting session");
        reduce(&mut self.state, Action::SelectSession(id))?;
        Ok(())
    }

    /// Switch to a fresh, empty session and return its id
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScholarError::Busy`] while a request is in flight.
    pub fn new_chat(&mut self) -> Result<SessionId> {
        let id = SessionId::mint();
        reduce(&mut self.state, Action::NewChat(id.clone()))?;
        tracing::info!(session_id = %id, "Started new chat");
        Ok(id)
    }

    /// Ask `content` with the currently selected mode
    ///
    /// On an answer, a history refresh is issued in the background after the
    /// reply has been appended.
    pub async fn send_query(&mut self, content: &str) -> Result<AskOutcome> {
        self.sync_sessions();
        let mode = self.modes.current();
        let settled = self
            .dispatcher
            .send_query(&mut self.state, content, mode)
            .await?;
        self.run_effects(&settled.effects);
        Ok(settled.outcome)
    }

    /// Upload `file` for analysis
    pub async fn upload_file(&mut self, file: UploadFile) -> Result<UploadOutcome> {
        self.sync_sessions();
        let settled = self.dispatcher.upload_file(&mut self.state, file).await?;
        self.run_effects(&settled.effects);
        Ok(settled.outcome)
    }

    /// Submit the input box: a staged file is uploaded, otherwise the text is
    /// asked
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScholarError::EmptyQuery`] for blank text with
    /// no staged file, before any network call.
    pub async fn submit(&mut self, content: &str, staged: Option<UploadFile>) -> Result<Submission> {
        match staged {
            Some(file) => Ok(Submission::Uploaded(self.upload_file(file).await?)),
            None => Ok(Submission::Asked(self.send_query(content).await?)),
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.modes.current()
    }

    /// Select the mode for subsequent queries and return the previous one
    pub fn select_mode(&mut self, mode: ChatMode) -> ChatMode {
        self.modes.select(mode)
    }

    pub fn modes(&self) -> &ModeSelector {
        &self.modes
    }

    pub fn transcript(&self) -> &[Message] {
        self.state.transcript()
    }

    pub fn current_session(&self) -> &SessionId {
        self.state.current_session()
    }

    pub fn sessions(&self) -> &SessionStore {
        self.state.sessions()
    }

    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        self.state.sidebar()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Number of history refreshes issued, including the startup one
    pub fn refreshes_issued(&self) -> u64 {
        self.sync.refreshes_issued()
    }

    /// Whether a background history refresh has not landed yet
    pub fn refresh_pending(&self) -> bool {
        self.sync.has_pending()
    }
}
