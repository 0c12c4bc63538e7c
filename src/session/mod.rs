//! Sessions and the client-side copy of the conversation history
//!
//! The history service owns the authoritative mapping of session id to
//! transcript. [`SessionStore`] is the local copy of that mapping: it keeps
//! the server's key order (creation order), is replaced wholesale on every
//! refresh, and is never merged entry by entry.

pub mod sync;
pub mod types;

pub use sync::SessionSynchronizer;
pub use types::{Message, Role, SessionId};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Maximum number of characters of the last message shown as a sidebar title
const SIDEBAR_TITLE_CHARS: usize = 30;

/// Title shown for a session that has no messages yet
const EMPTY_SESSION_TITLE: &str = "Empty Chat";

/// A named, ordered transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub messages: Vec<Message>,
}

/// Insertion-ordered mapping of session id to transcript
///
/// Deserializes from the `/history` JSON object without losing key order and
/// serializes back to an object in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    sessions: Vec<Session>,
    // Position of each id in `sessions`
    index: HashMap<SessionId, usize>,
}

/// One row of the session sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub active: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session's transcript
    ///
    /// A new id goes to the end; an existing id keeps its position.
    pub fn insert(&mut self, id: SessionId, messages: Vec<Message>) {
        match self.index.get(&id) {
            Some(&position) => self.sessions[position].messages = messages,
            None => {
                self.index.insert(id.clone(), self.sessions.len());
                self.sessions.push(Session { id, messages });
            }
        }
    }

    /// Transcript of `id`, if the history contains it
    pub fn get(&self, id: &SessionId) -> Option<&[Message]> {
        self.index
            .get(id)
            .map(|&position| self.sessions[position].messages.as_slice())
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Sidebar rows, newest session first
    ///
    /// Each title is the last message of the session cut to 30 characters,
    /// with `...` appended when it was longer.
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::session::{Message, SessionId, SessionStore};
    ///
    /// let mut store = SessionStore::new();
    /// store.insert(SessionId::from("a"), vec![Message::user("first question")]);
    /// store.insert(SessionId::from("b"), vec![]);
    ///
    /// let entries = store.sidebar_entries(Some(&SessionId::from("a")));
    /// assert_eq!(entries[0].title, "Empty Chat");
    /// assert_eq!(entries[1].title, "first question");
    /// assert!(entries[1].active);
    /// ```
    pub fn sidebar_entries(&self, current: Option<&SessionId>) -> Vec<SidebarEntry> {
        self.sessions
            .iter()
            .rev()
            .map(|session| SidebarEntry {
                id: session.id.clone(),
                title: sidebar_title(&session.messages),
                message_count: session.messages.len(),
                active: current == Some(&session.id),
            })
            .collect()
    }
}

fn sidebar_title(messages: &[Message]) -> String {
    let Some(last) = messages.last() else {
        return EMPTY_SESSION_TITLE.to_string();
    };
    let content = last.content();
    if content.is_empty() {
        return EMPTY_SESSION_TITLE.to_string();
    }
    let mut title: String = content.chars().take(SIDEBAR_TITLE_CHARS).collect();
    if content.chars().count() > SIDEBAR_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

impl Serialize for SessionStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.sessions.iter().map(|s| (&s.id, &s.messages)))
    }
}

impl<'de> Deserialize<'de> for SessionStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = SessionStore;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of session id to message list")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut store = SessionStore::new();
                while let Some((id, messages)) = map.next_entry::<SessionId, Vec<Message>>()? {
                    store.insert(id, messages);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
