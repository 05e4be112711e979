//! In-memory session store.
//!
//! Sessions live only in process memory for their lifetime. The outer map
//! lock is held just long enough to fetch or insert a handle; all per-session
//! work happens under that session's own mutex, so unrelated sessions never
//! block each other.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::domain::classification::ClassificationSession;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SharedSession};

/// In-memory keyed session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SharedSession>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: ClassificationSession) -> SharedSession {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, handle.clone());
        handle
    }

    async fn find(&self, id: &SessionId) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    async fn remove_inactive(&self, max_age: Duration) -> usize {
        let mut sessions = self.sessions.write().await;

        let mut expired = Vec::new();
        for (id, handle) in sessions.iter() {
            let session = handle.lock().await;
            if session.last_activity().elapsed() > max_age {
                expired.push(*id);
            }
        }

        for id in &expired {
            sessions.remove(id);
        }

        if !expired.is_empty() {
            info!(removed = expired.len(), "cleaned up expired sessions");
        }
        expired.len()
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
