//! Application configuration.
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `DEPT_COMPASS`
//! prefix and `__` as the nesting separator, e.g.
//! `DEPT_COMPASS__POLICY__MAX_QUESTIONS=10`.

mod error;

pub use error::{ConfigError, ConfigValidationError};

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::classification::Policy;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Catalog data file locations.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Stopping-policy thresholds and learning rate.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Session store housekeeping.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Locations of the catalog's JSON files.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_departments_file")]
    pub departments_file: PathBuf,

    #[serde(default = "default_questions_file")]
    pub questions_file: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            departments_file: default_departments_file(),
            questions_file: default_questions_file(),
        }
    }
}

fn default_departments_file() -> PathBuf {
    PathBuf::from("data/departments.json")
}

fn default_questions_file() -> PathBuf {
    PathBuf::from("data/question_bank.json")
}

/// Stopping-policy settings. Defaults match the reference deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: f64,

    #[serde(default = "default_early_termination_threshold")]
    pub early_termination_threshold: f64,

    #[serde(default = "default_max_questions")]
    pub max_questions: usize,

    #[serde(default = "default_min_adaptive_questions")]
    pub min_adaptive_questions: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_high_confidence_level")]
    pub high_confidence_level: f64,

    #[serde(default = "default_moderate_confidence_level")]
    pub moderate_confidence_level: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            secondary_threshold: default_secondary_threshold(),
            early_termination_threshold: default_early_termination_threshold(),
            max_questions: default_max_questions(),
            min_adaptive_questions: default_min_adaptive_questions(),
            learning_rate: default_learning_rate(),
            high_confidence_level: default_high_confidence_level(),
            moderate_confidence_level: default_moderate_confidence_level(),
        }
    }
}

impl PolicyConfig {
    /// Converts into the domain policy consumed by the engine.
    pub fn to_policy(&self) -> Policy {
        Policy {
            confidence_threshold: self.confidence_threshold,
            secondary_threshold: self.secondary_threshold,
            early_termination_threshold: self.early_termination_threshold,
            max_questions: self.max_questions,
            min_adaptive_questions: self.min_adaptive_questions,
            learning_rate: self.learning_rate,
            high_confidence_level: self.high_confidence_level,
            moderate_confidence_level: self.moderate_confidence_level,
        }
    }
}

fn default_confidence_threshold() -> f64 {
    0.85
}
fn default_secondary_threshold() -> f64 {
    0.70
}
fn default_early_termination_threshold() -> f64 {
    0.80
}
fn default_max_questions() -> usize {
    12
}
fn default_min_adaptive_questions() -> usize {
    2
}
fn default_learning_rate() -> f64 {
    0.3
}
fn default_high_confidence_level() -> f64 {
    0.8
}
fn default_moderate_confidence_level() -> f64 {
    0.6
}

/// Session store housekeeping settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions inactive for longer than this are removed by the GC sweep.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
        }
    }
}

fn default_max_age_hours() -> i64 {
    24
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads a `.env` file if present (development), then environment
    /// variables with the `DEPT_COMPASS` prefix and `__` separator.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DEPT_COMPASS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates all configuration values; any failure is fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let probabilities = [
            ("policy.confidence_threshold", self.policy.confidence_threshold),
            ("policy.secondary_threshold", self.policy.secondary_threshold),
            (
                "policy.early_termination_threshold",
                self.policy.early_termination_threshold,
            ),
            ("policy.learning_rate", self.policy.learning_rate),
            (
                "policy.high_confidence_level",
                self.policy.high_confidence_level,
            ),
            (
                "policy.moderate_confidence_level",
                self.policy.moderate_confidence_level,
            ),
        ];
        for (field, value) in probabilities {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ConfigValidationError::NotAProbability { field, value });
            }
        }

        if self.policy.max_questions == 0 {
            return Err(ConfigValidationError::ZeroLimit {
                field: "policy.max_questions",
            });
        }
        if self.policy.moderate_confidence_level > self.policy.high_confidence_level {
            return Err(ConfigValidationError::ConfidenceLevelOrder);
        }
        if self.session.max_age_hours < 0 {
            return Err(ConfigValidationError::Negative {
                field: "session.max_age_hours",
                value: self.session.max_age_hours,
            });
        }
        if self.catalog.departments_file.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath {
                field: "catalog.departments_file",
            });
        }
        if self.catalog.questions_file.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath {
                field: "catalog.questions_file",
            });
        }

        Ok(())
    }
}
