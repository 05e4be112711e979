//! Trait-score update rule.
//!
//! Shared by real updates and by the lookahead simulation in question
//! selection, so the two can never drift apart.

use crate::domain::catalog::{Question, TraitVector};
use crate::domain::foundation::LikertResponse;

/// Applies one Likert response to a trait vector.
///
/// The response is normalized linearly onto [0, 1] and blended into the
/// question's primary trait with `strength = confidence * learning_rate`.
/// Each secondary trait receives the same blend at half strength. Results
/// are clamped to [0, 1] by the blend itself.
pub fn apply_response(
    scores: &mut TraitVector,
    question: &Question,
    response: LikertResponse,
    confidence: f64,
    learning_rate: f64,
) {
    let target = response.normalized();
    let strength = confidence * learning_rate;

    scores.blend(question.primary_trait(), target, strength);

    let secondary_strength = strength * 0.5;
    for &trait_index in question.secondary_traits() {
        scores.blend(trait_index, target, secondary_strength);
    }
}
