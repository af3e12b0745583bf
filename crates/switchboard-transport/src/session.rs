//! Session bookkeeping for the session-keyed transport.
//!
//! A session is minted when an `initialize` request arrives without a
//! session id and lives until the client closes it or it sits idle past the
//! configured timeout. The registry is the only state shared between
//! connections.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use switchboard_json_rpc::SessionContext;

/// Lifecycle of a session; nothing leaves `Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Active => "active",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session [{0}] is closed")]
    Closed(String),
}

#[derive(Debug)]
struct HandleState {
    state: SessionState,
    last_seen: Instant,
}

/// The transport handle registered under a session id.
///
/// Requests for one session take turns through [`SessionHandle::acquire`]
/// so responses keep the order their requests arrived in.
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    state: Mutex<HandleState>,
    turn: Mutex<()>,
}

impl SessionHandle {
    fn new(id: String) -> Self {
        Self {
            id,
            state: Mutex::new(HandleState {
                state: SessionState::Uninitialized,
                last_seen: Instant::now(),
            }),
            turn: Mutex::new(()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Context handed to the service for requests on this session
    pub fn context(&self) -> SessionContext {
        SessionContext::new(self.id.clone())
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.state
    }

    /// Wait for this session's turn; held for the duration of one request
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }

    /// Mark a successful initialize
    pub async fn activate(&self) -> Result<(), SessionError> {
        let mut inner = self.state.lock().await;
        match inner.state {
            SessionState::Closed => Err(SessionError::Closed(self.id.clone())),
            _ => {
                inner.state = SessionState::Active;
                inner.last_seen = Instant::now();
                Ok(())
            }
        }
    }

    pub async fn close(&self) {
        self.state.lock().await.state = SessionState::Closed;
    }

    /// Record activity, pushing back idle expiry
    pub async fn touch(&self) -> Result<(), SessionError> {
        let mut inner = self.state.lock().await;
        if inner.state == SessionState::Closed {
            return Err(SessionError::Closed(self.id.clone()));
        }
        inner.last_seen = Instant::now();
        Ok(())
    }

    pub async fn idle_for(&self) -> Duration {
        self.state.lock().await.last_seen.elapsed()
    }
}

/// Lock-protected map of live sessions
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, Arc<SessionHandle>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new session id and register an uninitialized handle for it
    pub async fn create(&self) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle::new(Uuid::now_v7().to_string()));
        self.sessions
            .lock()
            .await
            .insert(handle.id.clone(), Arc::clone(&handle));
        debug!(session_id = %handle.id, "Session created");
        handle
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.lock().await.get(session_id).cloned()
    }

    /// Remove a session and close its handle
    pub async fn remove(&self, session_id: &str) -> Option<Arc<SessionHandle>> {
        let removed = self.sessions.lock().await.remove(session_id);
        if let Some(handle) = &removed {
            handle.close().await;
            debug!(session_id = %session_id, "Session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Close and drop every session idle for longer than `max_idle`,
    /// returning the expired ids
    pub async fn expire_idle(&self, max_idle: Duration) -> Vec<String> {
        let handles: Vec<Arc<SessionHandle>> =
            self.sessions.lock().await.values().cloned().collect();

        let mut expired = Vec::new();
        for handle in handles {
            if handle.idle_for().await > max_idle {
                expired.push(handle.id.clone());
            }
        }

        for session_id in &expired {
            self.remove(session_id).await;
        }
        if !expired.is_empty() {
            info!("Expired {} idle sessions", expired.len());
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let registry = SessionRegistry::new();
        let handle = registry.create().await;
        assert_eq!(handle.state().await, SessionState::Uninitialized);
        assert!(registry.get(handle.id()).await.is_some());

        handle.activate().await.unwrap();
        assert_eq!(handle.state().await, SessionState::Active);

        let removed = registry.remove(handle.id()).await.unwrap();
        assert_eq!(removed.state().await, SessionState::Closed);
        assert!(registry.get(handle.id()).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_closed_is_terminal() {
        let registry = SessionRegistry::new();
        let handle = registry.create().await;
        handle.close().await;

        assert_eq!(
            handle.activate().await,
            Err(SessionError::Closed(handle.id().to_string()))
        );
        assert!(handle.touch().await.is_err());
        assert_eq!(handle.state().await, SessionState::Closed);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let registry = SessionRegistry::new();
        let a = registry.create().await;
        let b = registry.create().await;
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len().await, 2);
        assert_eq!(a.context().session_id, a.id());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let registry = SessionRegistry::new();
        let stale = registry.create().await;
        let fresh = registry.create().await;

        tokio::time::advance(Duration::from_secs(90)).await;
        fresh.touch().await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        let expired = registry.expire_idle(Duration::from_secs(60)).await;
        assert_eq!(expired, vec![stale.id().to_string()]);
        assert_eq!(stale.state().await, SessionState::Closed);
        assert!(registry.get(fresh.id()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_turns_are_exclusive() {
        let registry = SessionRegistry::new();
        let handle = registry.create().await;

        let first = handle.acquire().await;
        assert!(handle.turn.try_lock().is_err());
        drop(first);
        assert!(handle.turn.try_lock().is_ok());
    }
}
