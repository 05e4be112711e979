//! Ports: interfaces the application layer depends on.

mod session_store;

pub use session_store::{SessionStore, SharedSession};
