//! Configuration error types.

use thiserror::Error;

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failures; all are fatal at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("'{field}' must be within (0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },

    #[error("'{field}' must be at least 1")]
    ZeroLimit { field: &'static str },

    #[error("'{field}' must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("confidence level cut points must satisfy moderate <= high")]
    ConfidenceLevelOrder,

    #[error("'{field}' must not be empty")]
    EmptyPath { field: &'static str },
}
