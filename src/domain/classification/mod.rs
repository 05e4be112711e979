//! The decision engine: trait updates, probability recomputation,
//! adaptive question selection, and the stopping policy.

pub mod policy;
pub mod probability;
mod result;
mod session;
pub mod update;

pub use policy::{Decision, Policy, PolicyInput, StopReason};
pub use result::{ClassificationResult, ConfidenceLevel, TraitScore};
pub use session::{ClassificationSession, SessionState, UserResponse};
