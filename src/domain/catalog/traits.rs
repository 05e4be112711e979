//! Canonical trait axes and index-addressed trait vectors.
//!
//! The trait list is fixed once at startup. All numeric work (blending,
//! similarity) runs over dense vectors addressed by stable index; the
//! name-to-index lookup exists only at the boundary where catalog files
//! and presentation types speak in trait names.

use serde::Serialize;
use std::collections::HashMap;

/// Trait axes used by the shipped catalog.
pub const CANONICAL_TRAITS: [&str; 8] = [
    "analytical",
    "creative",
    "organized",
    "social",
    "technical",
    "leadership",
    "detail_oriented",
    "adaptable",
];

/// The fixed, ordered set of trait axes for one catalog.
///
/// # Invariants
///
/// - Names are unique and non-empty
/// - Order never changes after construction
#[derive(Debug, Clone)]
pub struct TraitCatalog {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl TraitCatalog {
    /// Builds a trait catalog from an ordered name list.
    ///
    /// Returns `None` if the list is empty or contains duplicates.
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() || index.insert(name.clone(), i).is_some() {
                return None;
            }
        }
        Some(Self { names, index })
    }

    /// The canonical trait set of the shipped catalog.
    pub fn canonical() -> Self {
        Self::new(CANONICAL_TRAITS.iter().map(|s| s.to_string()).collect())
            .unwrap_or_else(|| unreachable!("canonical trait list is non-empty and unique"))
    }

    /// Number of trait axes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the catalog has no axes (never constructible, kept for clippy).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Ordered trait names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the trait at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Index of a trait name, if it belongs to the canonical set.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Dense vector of per-trait values, addressed by `TraitCatalog` index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TraitVector(Vec<f64>);

impl TraitVector {
    /// A vector with every trait at the neutral midpoint (0.5).
    pub fn neutral(len: usize) -> Self {
        Self(vec![0.5; len])
    }

    /// Builds a vector from explicit values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of trait axes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// All values in trait order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Exponentially blends the value at `index` toward `target`.
    ///
    /// `new = old * (1 - strength) + target * strength`, clamped to [0, 1].
    /// The clamp is a safety net against floating-point drift only; inputs
    /// are validated before they reach this point.
    pub fn blend(&mut self, index: usize, target: f64, strength: f64) {
        let old = self.0[index];
        let new = old * (1.0 - strength) + target * strength;
        self.0[index] = new.clamp(0.0, 1.0);
    }
}
