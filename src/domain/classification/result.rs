//! Classification result: a presentation snapshot of a session.
//!
//! Results are derived, never stored. Each round recomputes a fresh
//! snapshot from the session's current state.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::catalog::Catalog;
use crate::domain::classification::{ClassificationSession, Policy};
use crate::domain::foundation::SessionId;

/// Confidence grade derived from the top probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    /// Grades a top probability against the policy's cut points.
    pub fn grade(top_probability: f64, policy: &Policy) -> Self {
        if top_probability >= policy.high_confidence_level {
            ConfidenceLevel::High
        } else if top_probability >= policy.moderate_confidence_level {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// One trait with its current score, for the top-traits listing.
#[derive(Debug, Clone, Serialize)]
pub struct TraitScore {
    pub name: String,
    pub score: f64,
}

/// Reportable classification snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub session_id: SessionId,
    pub top_department: String,
    pub top_probability: f64,
    pub secondary_department: Option<String>,
    pub secondary_probability: Option<f64>,
    pub all_probabilities: BTreeMap<String, f64>,
    pub questions_asked: usize,
    pub confidence_level: ConfidenceLevel,
    pub should_continue: bool,
    pub is_complete: bool,
    pub top_traits: Vec<TraitScore>,
    pub reasoning: String,
}

impl ClassificationResult {
    /// Builds a snapshot of the session at this instant.
    ///
    /// Probabilities are rounded to 3 decimals for presentation; the
    /// session keeps full precision.
    pub fn build(
        session: &ClassificationSession,
        catalog: &Catalog,
        policy: &Policy,
        should_continue: bool,
    ) -> Self {
        let ((top_index, top_prob), second) = session.top_two();
        let top_department = catalog.department(top_index).id().to_string();
        let secondary_department = second.map(|(i, _)| catalog.department(i).id().to_string());
        let second_prob = second.map_or(0.0, |(_, p)| p);

        let all_probabilities = session
            .probabilities()
            .iter()
            .enumerate()
            .map(|(i, &p)| (catalog.department(i).id().to_string(), round3(p)))
            .collect();

        let questions_asked = session.answered();
        let reasoning = if should_continue {
            progress_reasoning(&top_department, top_prob)
        } else {
            stop_reasoning(policy, questions_asked, top_prob, second_prob)
        };

        let top_traits = session
            .top_traits(catalog.traits(), 5)
            .into_iter()
            .map(|(name, score)| TraitScore {
                name,
                score: round3(score),
            })
            .collect();

        Self {
            session_id: session.id(),
            top_department,
            top_probability: round3(top_prob),
            secondary_department,
            secondary_probability: second.map(|(_, p)| round3(p)),
            all_probabilities,
            questions_asked,
            confidence_level: ConfidenceLevel::grade(top_prob, policy),
            should_continue,
            is_complete: !should_continue,
            top_traits,
            reasoning,
        }
    }
}

/// Reasoning for a terminal snapshot, keyed to whichever stop fired.
fn stop_reasoning(policy: &Policy, questions_asked: usize, top_prob: f64, second_prob: f64) -> String {
    if top_prob >= policy.confidence_threshold {
        format!("High confidence achieved ({:.1}%)", top_prob * 100.0)
    } else if questions_asked >= policy.max_questions {
        format!("Maximum questions ({}) reached", policy.max_questions)
    } else {
        format!(
            "Clear leader identified ({:.1}% vs {:.1}%)",
            top_prob * 100.0,
            second_prob * 100.0
        )
    }
}

/// Reasoning for a mid-session snapshot.
fn progress_reasoning(top_department: &str, top_prob: f64) -> String {
    if top_prob >= 0.7 {
        format!(
            "Good progress, {} leading with {:.1}%",
            top_department,
            top_prob * 100.0
        )
    } else if top_prob >= 0.5 {
        format!(
            "Moderate confidence, {} at {:.1}%",
            top_department,
            top_prob * 100.0
        )
    } else {
        format!(
            "Still determining best match, top is {:.1}%",
            top_prob * 100.0
        )
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
