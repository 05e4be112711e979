//! Keyed session store port.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::classification::ClassificationSession;
use crate::domain::foundation::SessionId;

/// Handle to one session.
///
/// The per-session mutex is the exclusion mechanism for the read-modify-write
/// sequence of `process_response`: operations on the same session serialize
/// on this lock, while operations on different sessions never contend.
pub type SharedSession = Arc<Mutex<ClassificationSession>>;

/// Keyed store for live classification sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session and returns its handle.
    async fn insert(&self, session: ClassificationSession) -> SharedSession;

    /// Finds the handle for a session id.
    async fn find(&self, id: &SessionId) -> Option<SharedSession>;

    /// Removes every session whose last activity is older than `max_age`.
    ///
    /// Returns the number of sessions removed. Pure hygiene; never affects
    /// the stopping logic of sessions still in use.
    async fn remove_inactive(&self, max_age: Duration) -> usize;

    /// Number of live sessions.
    async fn count(&self) -> usize;
}
