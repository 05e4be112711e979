//! Classification session aggregate.

use serde::Serialize;
use std::fmt;

use crate::domain::catalog::{Catalog, Question, TraitCatalog, TraitVector};
use crate::domain::classification::{probability, update};
use crate::domain::foundation::{Confidence, LikertResponse, SessionId, Timestamp};

/// Phase of a classification session.
///
/// Advisory bookkeeping: the authoritative phase boundary is the count of
/// answered questions versus the seed-question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    SeedQuestions,
    AdaptiveQuestions,
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::SeedQuestions => "seed_questions",
            SessionState::AdaptiveQuestions => "adaptive_questions",
            SessionState::Complete => "complete",
        };
        write!(f, "{}", s)
    }
}

/// One answered question. Created once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub question_id: String,
    pub response: LikertResponse,
    pub confidence: Confidence,
    pub answered_at: Timestamp,
}

/// A live classification session.
///
/// # Invariants
///
/// - Every trait score stays in [0, 1]
/// - `probabilities` is aligned with catalog department order, entries are
///   non-negative and sum to 1 within floating tolerance
/// - `questions_asked` contains no duplicate id; seed questions appear in
///   catalog seed order strictly before any adaptive question
/// - `state` only moves forward; `Complete` is terminal
#[derive(Debug, Clone)]
pub struct ClassificationSession {
    id: SessionId,
    state: SessionState,
    trait_scores: TraitVector,
    probabilities: Vec<f64>,
    responses: Vec<UserResponse>,
    questions_asked: Vec<String>,
    created_at: Timestamp,
    last_activity: Timestamp,
    completed_at: Option<Timestamp>,
}

impl ClassificationSession {
    /// Creates a fresh session: neutral trait scores, uniform department
    /// probabilities, seed phase.
    pub fn new(catalog: &Catalog) -> Self {
        let now = Timestamp::now();
        let dept_count = catalog.department_count();
        Self {
            id: SessionId::new(),
            state: SessionState::SeedQuestions,
            trait_scores: TraitVector::neutral(catalog.traits().len()),
            probabilities: vec![1.0 / dept_count as f64; dept_count],
            responses: Vec::new(),
            questions_asked: Vec::new(),
            created_at: now,
            last_activity: now,
            completed_at: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn trait_scores(&self) -> &TraitVector {
        &self.trait_scores
    }

    /// Department probabilities aligned with catalog department order.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn responses(&self) -> &[UserResponse] {
        &self.responses
    }

    pub fn questions_asked(&self) -> &[String] {
        &self.questions_asked
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Number of answered questions. Drives the phase boundary.
    pub fn answered(&self) -> usize {
        self.responses.len()
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// True if this question id has already been answered.
    pub fn has_asked(&self, question_id: &str) -> bool {
        self.questions_asked.iter().any(|id| id == question_id)
    }

    /// The leading department and, when more than one exists, the runner-up.
    ///
    /// Ties resolve to the earliest catalog index.
    pub fn top_two(&self) -> ((usize, f64), Option<(usize, f64)>) {
        probability::top_two(&self.probabilities)
    }

    /// The `count` highest trait scores as (name, score) pairs,
    /// highest first. Ties resolve to canonical trait order.
    pub fn top_traits(&self, traits: &TraitCatalog, count: usize) -> Vec<(String, f64)> {
        let mut scored: Vec<(usize, f64)> = self
            .trait_scores
            .values()
            .iter()
            .copied()
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(count)
            .map(|(index, score)| (traits.name(index).to_string(), score))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Absorbs one answer: records the response, updates trait scores, and
    /// recomputes the department distribution from scratch.
    ///
    /// Callers must have validated that the question has not been answered
    /// before and that the session is not complete.
    pub fn absorb_response(
        &mut self,
        catalog: &Catalog,
        question: &Question,
        response: LikertResponse,
        confidence: Confidence,
        learning_rate: f64,
    ) {
        self.responses.push(UserResponse {
            question_id: question.id().to_string(),
            response,
            confidence,
            answered_at: Timestamp::now(),
        });
        self.questions_asked.push(question.id().to_string());
        self.touch();

        update::apply_response(
            &mut self.trait_scores,
            question,
            response,
            confidence.value(),
            learning_rate,
        );
        self.probabilities =
            probability::department_probabilities(&self.trait_scores, catalog.departments());
    }

    /// Refreshes the last-activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity = Timestamp::now();
    }

    /// Moves the advisory state to the adaptive phase once all seed
    /// questions are answered. Never moves backward.
    pub fn advance_phase(&mut self, seed_len: usize) {
        if self.state == SessionState::SeedQuestions && self.answered() >= seed_len {
            self.state = SessionState::AdaptiveQuestions;
        }
    }

    /// Marks the session complete. Terminal; repeated calls keep the first
    /// completion timestamp.
    pub fn complete(&mut self) {
        if self.state != SessionState::Complete {
            self.state = SessionState::Complete;
            self.completed_at = Some(Timestamp::now());
        }
    }

    #[cfg(test)]
    pub(crate) fn set_last_activity(&mut self, timestamp: Timestamp) {
        self.last_activity = timestamp;
    }
}
