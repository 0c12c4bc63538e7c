//! In-process fake backend for orchestrator unit tests
//!
//! [`FakeBackend`] plays the assistant service without any network I/O.
//! Replies to `ask` and `upload` are scripted per call; when the script runs
//! out the backend falls back to a canned answer. Like the real service it
//! records every successful exchange in its own history, so a refresh after
//! an ask returns the new exchange.
//!
//! # Example
//!
//! ```ignore
//! let backend = FakeBackend::new();
//! backend.push_ask(FakeReply::Ok(AskReply { answer: Some("42".into()), error: None }));
//! backend.push_ask(FakeReply::Fail("connection refused".into()));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{AskReply, AskRequest, AssistantBackend, UploadFile, UploadReply};
use crate::error::{Result, ScholarError};
use crate::session::{Message, SessionStore};

/// Scripted response for one backend call
#[derive(Debug, Clone)]
pub enum FakeReply<T> {
    /// Return this value
    Ok(T),
    /// Fail as a transport error with this message
    Fail(String),
    /// Panic inside the call, as a misbehaving transport would
    Panic,
}

impl<T> FakeReply<T> {
    fn resolve(self, call: &str) -> Result<T> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Fail(message) => Err(ScholarError::Transport(message).into()),
            Self::Panic => panic!("FakeBackend: scripted panic in {}", call),
        }
    }
}

/// In-process [`AssistantBackend`] for tests
#[derive(Debug, Default)]
pub struct FakeBackend {
    ask_script: Mutex<VecDeque<FakeReply<AskReply>>>,
    upload_script: Mutex<VecDeque<FakeReply<UploadReply>>>,
    history: Mutex<SessionStore>,
    history_fails: AtomicBool,
    asked: Mutex<Vec<AskRequest>>,
    ask_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `store` as the server-side history
    pub fn with_history(store: SessionStore) -> Self {
        let backend = Self::default();
        *backend.history.lock().expect("history lock") = store;
        backend
    }

    pub fn push_ask(&self, reply: FakeReply<AskReply>) {
        self.ask_script
            .lock()
            .expect("ask script lock")
            .push_back(reply);
    }

    pub fn push_answer(&self, answer: &str) {
        self.push_ask(FakeReply::Ok(AskReply {
            answer: Some(answer.to_string()),
            error: None,
        }));
    }

    pub fn push_upload(&self, reply: FakeReply<UploadReply>) {
        self.upload_script
            .lock()
            .expect("upload script lock")
            .push_back(reply);
    }

    /// Make every subsequent history fetch fail
    pub fn fail_history(&self, fail: bool) {
        self.history_fails.store(fail, Ordering::SeqCst);
    }

    pub fn asked(&self) -> Vec<AskRequest> {
        self.asked.lock().expect("asked lock").clone()
    }

    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.ask_calls() + self.upload_calls() + self.history_calls()
    }
}

#[async_trait]
impl AssistantBackend for FakeBackend {
    async fn fetch_history(&self) -> Result<SessionStore> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.history_fails.load(Ordering::SeqCst) {
            return Err(ScholarError::Transport("history unavailable".to_string()).into());
        }
        Ok(self.history.lock().expect("history lock").clone())
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        self.asked
            .lock()
            .expect("asked lock")
            .push(request.clone());

        let scripted = self.ask_script.lock().expect("ask script lock").pop_front();
        let reply = scripted
            .unwrap_or_else(|| {
                FakeReply::Ok(AskReply {
                    answer: Some(format!("Answer to: {}", request.question)),
                    error: None,
                })
            })
            .resolve("ask")?;

        if let (Some(answer), None) = (&reply.answer, &reply.error) {
            let mut history = self.history.lock().expect("history lock");
            let mut messages = history
                .get(&request.session_id)
                .map(<[Message]>::to_vec)
                .unwrap_or_default();
            messages.push(Message::user(request.question.clone()));
            messages.push(Message::assistant(answer.clone()));
            history.insert(request.session_id.clone(), messages);
        }

        Ok(reply)
    }

    async fn upload(&self, file: &UploadFile) -> Result<UploadReply> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .upload_script
            .lock()
            .expect("upload script lock")
            .pop_front();
        scripted
            .unwrap_or_else(|| {
                FakeReply::Ok(UploadReply {
                    filename: file.name.clone(),
                    analysis: format!("{} bytes analyzed", file.bytes.len()),
                })
            })
            .resolve("upload")
    }
}
