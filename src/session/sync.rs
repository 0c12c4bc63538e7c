//! History refresh
//!
//! The sidebar is rebuilt from the history service: once (awaited) at startup
//! and once in the background after every successful ask. Refreshes replace
//! the local [`SessionStore`] wholesale. A failed fetch is logged and
//! otherwise ignored.
//!
//! Background refreshes report back over a channel. Each refresh carries the
//! sequence number it was issued with, and a result older than one already
//! handed out is dropped, so the most recently issued refresh always wins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::AssistantBackend;
use crate::session::SessionStore;

/// Fetches the history mapping and hands back the newest result
#[derive(Debug)]
pub struct SessionSynchronizer {
    backend: Arc<dyn AssistantBackend>,
    tx: mpsc::UnboundedSender<(u64, SessionStore)>,
    rx: mpsc::UnboundedReceiver<(u64, SessionStore)>,
    in_flight: Vec<JoinHandle<()>>,
    last_issued: u64,
    last_applied: u64,
}

impl SessionSynchronizer {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            tx,
            rx,
            in_flight: Vec::new(),
            last_issued: 0,
            last_applied: 0,
        }
    }

    fn issue(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    fn accept(&mut self, seq: u64, store: SessionStore) -> Option<SessionStore> {
        if seq <= self.last_applied {
            tracing::debug!(seq, last_applied = self.last_applied, "Dropping stale history");
            return None;
        }
        self.last_applied = seq;
        Some(store)
    }

    /// Fetch the history and wait for it
    ///
    /// Returns `None` when the fetch failed or a newer refresh already landed.
    pub async fn refresh_now(&mut self) -> Option<SessionStore> {
        let seq = self.issue();
        match self.backend.fetch_history().await {
            Ok(store) => {
                tracing::debug!(seq, sessions = store.len(), "History refreshed");
                self.accept(seq, store)
            }
            Err(e) => {
                tracing::warn!("Error fetching history: {:#}", e);
                None
            }
        }
    }

    /// Issue a refresh on a background task without waiting for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_refresh(&mut self) {
        let seq = self.issue();
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        self.in_flight.retain(|handle| !handle.is_finished());
        self.in_flight.push(tokio::spawn(async move {
            match backend.fetch_history().await {
                Ok(store) => {
                    // The receiver lives as long as the synchronizer
                    let _ = tx.send((seq, store));
                }
                Err(e) => tracing::warn!("Error fetching history: {:#}", e),
            }
        }));
        tracing::debug!(seq, "History refresh issued");
    }

    /// Newest completed background refresh, without blocking
    pub fn take_latest(&mut self) -> Option<SessionStore> {
        let mut latest = None;
        while let Ok((seq, store)) = self.rx.try_recv() {
            if let Some(store) = self.accept(seq, store) {
                latest = Some(store);
            }
        }
        latest
    }

    /// Wait for every background refresh to finish, then take the newest
    pub async fn settle(&mut self) -> Option<SessionStore> {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!("History refresh task failed: {}", e);
            }
        }
        self.take_latest()
    }

    /// Number of refreshes issued so far, awaited or not
    pub fn refreshes_issued(&self) -> u64 {
        self.last_issued
    }

    /// Whether background refreshes are still running
    pub fn has_pending(&self) -> bool {
        self.in_flight.iter().any(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use crate::session::{Message, SessionId};

    fn store_with(id: &str, content: &str) -> SessionStore {
        let mut store = SessionStore::new();
        store.insert(SessionId::from(id), vec![Message::user(content)]);
        store
    }

    #[tokio::test]
    async fn test_refresh_now_returns_history() {
        let backend = Arc::new(FakeBackend::with_history(store_with("s1", "hello")));
        let mut sync = SessionSynchronizer::new(backend.clone());

        let store = sync.refresh_now().await.expect("history");
        assert!(store.contains(&SessionId::from("s1")));
        assert_eq!(backend.history_calls(), 1);
        assert_eq!(sync.refreshes_issued(), 1);
    }

    #[tokio::test]
    async fn test_refresh_now_tolerates_failure() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail_history(true);
        let mut sync = SessionSynchronizer::new(backend.clone());

        assert!(sync.refresh_now().await.is_none());
        assert_eq!(backend.history_calls(), 1);
    }

    #[tokio::test]
    async fn test_spawned_refresh_is_delivered_on_settle() {
        let backend = Arc::new(FakeBackend::with_history(store_with("s1", "hello")));
        let mut sync = SessionSynchronizer::new(backend.clone());

        sync.spawn_refresh();
        let store = sync.settle().await.expect("history");
        assert_eq!(store.len(), 1);
        assert_eq!(backend.history_calls(), 1);
        assert!(!sync.has_pending());
    }

    #[tokio::test]
    async fn test_failed_background_refresh_yields_nothing() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail_history(true);
        let mut sync = SessionSynchronizer::new(backend);

        sync.spawn_refresh();
        assert!(sync.settle().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let backend = Arc::new(FakeBackend::new());
        let mut sync = SessionSynchronizer::new(backend);

        let older = sync.issue();
        let newer = sync.issue();
        sync.tx.send((newer, store_with("new", "n"))).unwrap();
        sync.tx.send((older, store_with("old", "o"))).unwrap();

        let store = sync.take_latest().expect("newer history");
        assert!(store.contains(&SessionId::from("new")));
        assert!(sync.take_latest().is_none());
    }

    #[tokio::test]
    async fn test_take_latest_without_refresh_is_none() {
        let mut sync = SessionSynchronizer::new(Arc::new(FakeBackend::new()));
        assert!(sync.take_latest().is_none());
    }
}
