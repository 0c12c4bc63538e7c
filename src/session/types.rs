use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Sender of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed (or file uploaded) by the student
    User,
    /// Reply produced by the assistant service, or a local advisory
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a transcript
///
/// Messages carry no id or timestamp; their order inside a session is the
/// only ordering there is. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::session::{Message, Role};
    ///
    /// let msg = Message::user("What is a monad?");
    /// assert_eq!(msg.role(), Role::User);
    /// assert_eq!(msg.content(), "What is a monad?");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Highest millisecond value handed out by [`SessionId::mint`] in this process
static LAST_MINTED: AtomicI64 = AtomicI64::new(0);

/// Opaque session identifier
///
/// Ids minted locally look like `session_<unix millis>`; ids coming back from
/// the history service are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh id from the wall clock
    ///
    /// Minting is strictly monotonic within a process: when two calls land on
    /// the same millisecond (or the clock steps backwards) the later call
    /// takes the previous value plus one.
    ///
    /// # Examples
    ///
    /// ```
    /// use scholar::session::SessionId;
    ///
    /// let a = SessionId::mint();
    /// let b = SessionId::mint();
    /// assert_ne!(a, b);
    /// assert!(a.as_str().starts_with("session_"));
    /// ```
    pub fn mint() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let next = |last: i64| if now > last { now } else { last + 1 };
        let previous = LAST_MINTED
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(next(last)))
            .unwrap_or_else(|last| last);
        Self(format!("session_{}", next(previous)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hi");
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.content(), "hi");

        let assistant = Message::assistant("hello");
        assert_eq!(assistant.role(), Role::Assistant);
        assert_eq!(assistant.content(), "hello");
    }

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_value(Message::assistant("A monad is...")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "assistant", "content": "A monad is..."})
        );
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        let result = serde_json::from_str::<Message>(r#"{"role":"system","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_appending_preserves_order() {
        let mut messages = vec![Message::user("one"), Message::assistant("two")];
        messages.push(Message::user("three"));
        let contents: Vec<&str> = messages.iter().map(Message::content).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_mint_is_strictly_increasing() {
        let ids: Vec<i64> = (0..50)
            .map(|_| {
                SessionId::mint()
                    .as_str()
                    .trim_start_matches("session_")
                    .parse::<i64>()
                    .unwrap()
            })
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_session_id_is_transparent_on_the_wire() {
        let id = SessionId::from("session_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"session_42\"");
        assert_eq!(id.to_string(), "session_42");
    }
}
