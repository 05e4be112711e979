//! Department definitions with trait-weight vectors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CatalogError, TraitCatalog, TraitVector};

/// Raw department record as it appears in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub trait_weights: HashMap<String, f64>,
}

/// An immutable department with its weight vector resolved onto the
/// canonical trait order. Traits absent from the file contribute 0.
#[derive(Debug, Clone)]
pub struct Department {
    id: String,
    name: String,
    description: Option<String>,
    weights: TraitVector,
}

impl Department {
    /// Resolves a raw record against the trait catalog.
    ///
    /// # Errors
    ///
    /// - `UnknownTrait` if a weight references a trait outside the canonical set
    /// - `InvalidWeight` if a weight falls outside [0, 1]
    pub fn resolve(record: DepartmentRecord, traits: &TraitCatalog) -> Result<Self, CatalogError> {
        let mut weights = vec![0.0; traits.len()];
        for (trait_name, weight) in &record.trait_weights {
            let index = traits
                .index_of(trait_name)
                .ok_or_else(|| CatalogError::UnknownTrait {
                    owner: record.id.clone(),
                    trait_name: trait_name.clone(),
                })?;
            if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
                return Err(CatalogError::InvalidWeight {
                    department: record.id.clone(),
                    trait_name: trait_name.clone(),
                    weight: *weight,
                });
            }
            weights[index] = *weight;
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            weights: TraitVector::from_values(weights),
        })
    }

    /// Returns the department id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the trait-weight vector in canonical order.
    pub fn weights(&self) -> &TraitVector {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(weights: &[(&str, f64)]) -> DepartmentRecord {
        DepartmentRecord {
            id: "technicals".to_string(),
            name: "Technicals".to_string(),
            description: None,
            trait_weights: weights
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn resolve_places_weights_at_canonical_indices() {
        let traits = TraitCatalog::canonical();
        let dept =
            Department::resolve(record(&[("technical", 0.9), ("analytical", 0.7)]), &traits)
                .unwrap();

        assert_eq!(dept.weights().get(traits.index_of("technical").unwrap()), 0.9);
        assert_eq!(dept.weights().get(traits.index_of("analytical").unwrap()), 0.7);
    }

    #[test]
    fn resolve_defaults_absent_traits_to_zero() {
        let traits = TraitCatalog::canonical();
        let dept = Department::resolve(record(&[("technical", 0.9)]), &traits).unwrap();
        assert_eq!(dept.weights().get(traits.index_of("social").unwrap()), 0.0);
    }

    #[test]
    fn resolve_rejects_unknown_trait() {
        let traits = TraitCatalog::canonical();
        let result = Department::resolve(record(&[("charisma", 0.5)]), &traits);
        assert!(matches!(result, Err(CatalogError::UnknownTrait { .. })));
    }

    #[test]
    fn resolve_rejects_out_of_range_weight() {
        let traits = TraitCatalog::canonical();
        let result = Department::resolve(record(&[("technical", 1.2)]), &traits);
        assert!(matches!(result, Err(CatalogError::InvalidWeight { .. })));
    }
}
