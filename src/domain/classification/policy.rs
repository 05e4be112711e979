//! Stopping policy and information-gain question selection.
//!
//! After every answer the engine either picks the next question or stops.
//! Seed questions go out in fixed catalog order; adaptive questions are
//! chosen by simulated one-step-ahead entropy reduction.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Catalog, Question, QuestionStage, TraitVector};
use crate::domain::classification::{probability, update};
use crate::domain::foundation::LikertResponse;

/// Probability gap that lets the engine stop after the minimum number of
/// adaptive questions.
const CLEAR_LEADER_GAP: f64 = 0.20;

/// Threshold and gap for the faster stop available one adaptive question in.
const DECISIVE_TOP: f64 = 0.75;
const DECISIVE_GAP: f64 = 0.30;

/// Pure policy inputs for the stopping rules and trait updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Top-probability stop threshold.
    pub confidence_threshold: f64,
    /// Minimum top probability for the gap-based stop.
    pub secondary_threshold: f64,
    /// Boundary-check threshold fired right after the seed phase.
    pub early_termination_threshold: f64,
    /// Hard cap on answered rounds.
    pub max_questions: usize,
    /// Minimum adaptive rounds before the gap-based stop is eligible.
    pub min_adaptive_questions: usize,
    /// Blend strength for real trait updates.
    pub learning_rate: f64,
    /// Top probability graded as high confidence in results.
    pub high_confidence_level: f64,
    /// Top probability graded as moderate confidence in results.
    pub moderate_confidence_level: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.85,
            secondary_threshold: 0.70,
            early_termination_threshold: 0.80,
            max_questions: 12,
            min_adaptive_questions: 2,
            learning_rate: 0.3,
            high_confidence_level: 0.8,
            moderate_confidence_level: 0.6,
        }
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Top probability cleared the early-termination threshold the instant
    /// the last seed question was answered.
    EarlyTermination,
    /// Top probability cleared the confidence threshold.
    ConfidenceReached,
    /// The hard question cap was hit.
    MaxQuestionsReached,
    /// A clear leader emerged (gap-based stop).
    ClearLeader,
    /// No unused adaptive questions remain.
    PoolExhausted,
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy)]
pub enum Decision<'a> {
    /// Ask this question next.
    Ask(&'a Question),
    /// Stop and report.
    Stop(StopReason),
}

impl Decision<'_> {
    pub fn should_continue(&self) -> bool {
        matches!(self, Decision::Ask(_))
    }
}

/// Session inputs the policy needs; kept separate from the aggregate so the
/// policy stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub answered: usize,
    pub trait_scores: &'a TraitVector,
    pub probabilities: &'a [f64],
    pub questions_asked: &'a [String],
}

/// Decides, after an answer, whether to continue and with which question.
pub fn next_step<'a>(input: PolicyInput<'_>, catalog: &'a Catalog, policy: &Policy) -> Decision<'a> {
    let seed_len = catalog.seed_len();

    // Seed phase: fixed order, regardless of current probabilities.
    if input.answered < seed_len {
        return Decision::Ask(catalog.seed_question(input.answered));
    }

    let ((_, top_prob), second) = probability::top_two(input.probabilities);
    let second_prob = second.map_or(0.0, |(_, p)| p);
    let gap = top_prob - second_prob;

    // Early termination fires exactly once, the instant the last seed
    // question has been answered. A range check here would re-fire it on
    // later rounds; the equality is the contract.
    if input.answered == seed_len && top_prob >= policy.early_termination_threshold {
        return Decision::Stop(StopReason::EarlyTermination);
    }

    if top_prob >= policy.confidence_threshold {
        return Decision::Stop(StopReason::ConfidenceReached);
    }
    if input.answered >= policy.max_questions {
        return Decision::Stop(StopReason::MaxQuestionsReached);
    }
    if input.answered >= seed_len + policy.min_adaptive_questions
        && top_prob >= policy.secondary_threshold
        && gap >= CLEAR_LEADER_GAP
    {
        return Decision::Stop(StopReason::ClearLeader);
    }
    if input.answered >= seed_len + 1 && top_prob >= DECISIVE_TOP && gap >= DECISIVE_GAP {
        return Decision::Stop(StopReason::ClearLeader);
    }

    match select_adaptive_question(input, catalog, policy) {
        Some(question) => Decision::Ask(question),
        None => Decision::Stop(StopReason::PoolExhausted),
    }
}

/// Picks the unused adaptive question with the greatest weighted expected
/// information gain. Ties break to the first candidate in catalog load
/// order; that order is part of the observable contract.
fn select_adaptive_question<'a>(
    input: PolicyInput<'_>,
    catalog: &'a Catalog,
    policy: &Policy,
) -> Option<&'a Question> {
    let current_entropy = probability::shannon_entropy(input.probabilities);

    let mut best: Option<&Question> = None;
    let mut best_gain = f64::NEG_INFINITY;

    for question in catalog.questions() {
        if question.stage() != QuestionStage::Adaptive
            || input.questions_asked.iter().any(|id| id == question.id())
        {
            continue;
        }

        let gain = expected_information_gain(
            input.trait_scores,
            catalog,
            question,
            policy.learning_rate,
            current_entropy,
        );
        let weighted_gain = gain * question.information_value();

        if weighted_gain > best_gain {
            best_gain = weighted_gain;
            best = Some(question);
        }
    }

    best
}

/// Expected entropy reduction from asking `question`, simulating all five
/// responses with equal weight and full confidence.
pub fn expected_information_gain(
    trait_scores: &TraitVector,
    catalog: &Catalog,
    question: &Question,
    learning_rate: f64,
    current_entropy: f64,
) -> f64 {
    let mut expected_entropy = 0.0;

    for response in LikertResponse::ALL {
        let mut simulated = trait_scores.clone();
        update::apply_response(&mut simulated, question, response, 1.0, learning_rate);
        let probs = probability::department_probabilities(&simulated, catalog.departments());
        expected_entropy += probability::shannon_entropy(&probs) / 5.0;
    }

    (current_entropy - expected_entropy).max(0.0)
}
