//! Application layer: the classification service.

mod classifier;

pub use classifier::{Classifier, ClassifierError, SessionStatus};
