//! Foundation value objects shared across the domain.

mod confidence;
mod errors;
mod ids;
mod likert;
mod timestamp;

pub use confidence::Confidence;
pub use errors::ValidationError;
pub use ids::SessionId;
pub use likert::LikertResponse;
pub use timestamp::Timestamp;
