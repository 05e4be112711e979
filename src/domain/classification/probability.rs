//! Probability engine: cosine similarity, stable softmax, Shannon entropy.
//!
//! Department probabilities are recomputed from scratch from the current
//! trait vector every round. The previous distribution is discarded; this
//! is deliberately not a posterior accumulation.

use crate::domain::catalog::{Department, TraitVector};

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Converts raw similarity scores into a probability distribution.
///
/// Subtracts the maximum before exponentiating so large similarities never
/// overflow. Returns an empty vector for empty input.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Shannon entropy of a probability distribution, in bits.
///
/// Zero-probability entries contribute nothing (0 * log 0 = 0).
pub fn shannon_entropy(probabilities: &[f64]) -> f64 {
    probabilities
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// The highest-probability entry and, when more than one exists, the
/// runner-up, as (index, probability) pairs. Ties resolve to the earliest
/// index, so iteration order is deterministic.
pub fn top_two(probabilities: &[f64]) -> ((usize, f64), Option<(usize, f64)>) {
    let mut top: (usize, f64) = (0, f64::NEG_INFINITY);
    let mut second: Option<(usize, f64)> = None;

    for (index, &p) in probabilities.iter().enumerate() {
        if p > top.1 {
            second = if top.1.is_finite() { Some(top) } else { None };
            top = (index, p);
        } else if second.map_or(true, |(_, sp)| p > sp) {
            second = Some((index, p));
        }
    }

    (top, second)
}

/// Recomputes the department distribution for a trait vector.
///
/// The result is aligned with catalog department order and sums to 1.
pub fn department_probabilities(scores: &TraitVector, departments: &[Department]) -> Vec<f64> {
    let similarities: Vec<f64> = departments
        .iter()
        .map(|dept| cosine_similarity(scores.values(), dept.weights().values()))
        .collect();
    softmax(&similarities)
}
