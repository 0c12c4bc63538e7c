//! Conversation state and its transition function
//!
//! All mutations of the session list, the active-session pointer, the live
//! transcript and the busy flag go through [`reduce`]. The function is pure
//! with respect to I/O: network calls happen around it, and any follow-up
//! work it requires is returned as [`Effect`] values.

use crate::client::{AskOutcome, UploadOutcome};
use crate::error::ScholarError;
use crate::session::{Message, SessionId, SessionStore, SidebarEntry};

/// Kind of user-initiated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Ask,
    Upload,
}

/// Whether a user-initiated request is in flight, and which one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyState {
    #[default]
    Idle,
    Busy(Pending),
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Point at `id` and load its transcript from the history
    SelectSession(SessionId),
    /// Point at a freshly minted id with an empty transcript
    NewChat(SessionId),
    /// Optimistically echo a question and enter Busy
    QuerySubmitted(String),
    /// Record the answer (or failure) of the in-flight question
    QuerySettled(AskOutcome),
    /// Enter Busy for an upload
    UploadStarted,
    /// Record the analysis (or failure) of the in-flight upload
    UploadSettled(UploadOutcome),
    /// Replace the session list with a fetched history
    HistoryLoaded(SessionStore),
}

/// Follow-up work requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the history so the sidebar shows the latest exchange
    RefreshHistory,
}

/// Session list, active session, live transcript and busy flag
#[derive(Debug, Clone)]
pub struct ConversationState {
    sessions: SessionStore,
    current: SessionId,
    transcript: Vec<Message>,
    busy: BusyState,
}

impl ConversationState {
    /// Fresh state pointing at an unsaved session `current`
    pub fn new(current: SessionId) -> Self {
        Self {
            sessions: SessionStore::new(),
            current,
            transcript: Vec::new(),
            busy: BusyState::Idle,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn current_session(&self) -> &SessionId {
        &self.current
    }

    /// The live transcript of the active session
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn busy(&self) -> BusyState {
        self.busy
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.busy, BusyState::Busy(_))
    }

    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        self.sessions.sidebar_entries(Some(&self.current))
    }

    fn require_idle(&self) -> Result<(), ScholarError> {
        match self.busy {
            BusyState::Idle => Ok(()),
            BusyState::Busy(_) => Err(ScholarError::Busy),
        }
    }

    /// Only the request that is in flight may return the state to Idle
    fn settle(
        &mut self,
        kind: Pending,
        messages: impl IntoIterator<Item = Message>,
    ) -> Result<(), ScholarError> {
        if self.busy != BusyState::Busy(kind) {
            tracing::warn!(?kind, busy = ?self.busy, "Rejected settle for a request not in flight");
            return Err(ScholarError::NotInFlight(kind));
        }
        self.transcript.extend(messages);
        self.busy = BusyState::Idle;
        Ok(())
    }
}

/// Apply `action` to `state`
///
/// # Errors
///
/// Returns [`ScholarError::Busy`] when an action that needs an idle state
/// arrives while a request is in flight, [`ScholarError::EmptyQuery`] for
/// a blank question, and [`ScholarError::NotInFlight`] when a settle action
/// does not match the pending request. A rejected action leaves the state
/// untouched.
///
/// # Examples
///
/// ```
/// use scholar::client::AskOutcome;
/// use scholar::orchestrator::state::{reduce, Action, ConversationState, Effect};
/// use scholar::session::SessionId;
///
/// let mut state = ConversationState::new(SessionId::from("session_1"));
/// reduce(&mut state, Action::QuerySubmitted("hi".into())).unwrap();
/// assert!(state.is_busy());
///
/// let effects = reduce(&mut state, Action::QuerySettled(AskOutcome::Answer("hello".into()))).unwrap();
/// assert_eq!(effects, vec![Effect::RefreshHistory]);
/// assert_eq!(state.transcript().len(), 2);
/// assert!(!state.is_busy());
/// ```
pub fn reduce(state: &mut ConversationState, action: Action) -> Result<Vec<Effect>, ScholarError> {
    match action {
        Action::SelectSession(id) => {
            state.require_idle()?;
            state.transcript = state
                .sessions
                .get(&id)
                .map(<[Message]>::to_vec)
                .unwrap_or_default();
            state.current = id;
            Ok(Vec::new())
        }
        Action::NewChat(id) => {
            state.require_idle()?;
            state.current = id;
            state.transcript.clear();
            Ok(Vec::new())
        }
        Action::QuerySubmitted(content) => {
            state.require_idle()?;
            if content.trim().is_empty() {
                return Err(ScholarError::EmptyQuery);
            }
            state.transcript.push(Message::user(content));
            state.busy = BusyState::Busy(Pending::Ask);
            Ok(Vec::new())
        }
        Action::QuerySettled(outcome) => {
            state.settle(Pending::Ask, [outcome.to_message()])?;
            if outcome.is_answer() {
                Ok(vec![Effect::RefreshHistory])
            } else {
                Ok(Vec::new())
            }
        }
        Action::UploadStarted => {
            state.require_idle()?;
            state.busy = BusyState::Busy(Pending::Upload);
            Ok(Vec::new())
        }
        Action::UploadSettled(outcome) => {
            state.settle(Pending::Upload, outcome.to_messages())?;
            Ok(Vec::new())
        }
        Action::HistoryLoaded(store) => {
            state.sessions = store;
            Ok(Vec::new())
        }
    }
}
