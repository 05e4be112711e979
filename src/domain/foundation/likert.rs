//! Likert response value object (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Likert-scale answer: 1 (strongly disagree) to 5 (strongly agree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum LikertResponse {
    StronglyDisagree = 1,
    Disagree = 2,
    #[default]
    Neutral = 3,
    Agree = 4,
    StronglyAgree = 5,
}

impl LikertResponse {
    /// All five responses in ascending order, for lookahead simulation.
    pub const ALL: [LikertResponse; 5] = [
        LikertResponse::StronglyDisagree,
        LikertResponse::Disagree,
        LikertResponse::Neutral,
        LikertResponse::Agree,
        LikertResponse::StronglyAgree,
    ];

    /// Creates a LikertResponse from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(LikertResponse::StronglyDisagree),
            2 => Ok(LikertResponse::Disagree),
            3 => Ok(LikertResponse::Neutral),
            4 => Ok(LikertResponse::Agree),
            5 => Ok(LikertResponse::StronglyAgree),
            _ => Err(ValidationError::out_of_range(
                "response",
                1.0,
                5.0,
                value as f64,
            )),
        }
    }

    /// Returns the numeric value (1-5).
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Maps the 1-5 scale linearly onto [0, 1].
    pub fn normalized(&self) -> f64 {
        f64::from(self.value() - 1) / 4.0
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            LikertResponse::StronglyDisagree => "Strongly Disagree",
            LikertResponse::Disagree => "Disagree",
            LikertResponse::Neutral => "Neutral",
            LikertResponse::Agree => "Agree",
            LikertResponse::StronglyAgree => "Strongly Agree",
        }
    }
}

impl TryFrom<u8> for LikertResponse {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_u8(value)
    }
}

impl From<LikertResponse> for u8 {
    fn from(response: LikertResponse) -> u8 {
        response.value()
    }
}

impl fmt::Display for LikertResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
