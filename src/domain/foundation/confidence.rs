//! Confidence value object (0.0 to 1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Caller-supplied weight on how strongly a response should influence
/// trait scores. Always in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Full confidence (1.0), also used by the lookahead simulation.
    pub const FULL: Self = Self(1.0);

    /// Creates a Confidence, returning error if outside [0, 1] or not finite.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the inner value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> f64 {
        confidence.value()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
