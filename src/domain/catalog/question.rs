//! Question definitions: stage, targeted traits, and information value.

use serde::{Deserialize, Serialize};

use super::{CatalogError, TraitCatalog};

/// Phase a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStage {
    /// Always asked, in fixed catalog order, before any adaptive question.
    Seed,
    /// Selected dynamically by expected information gain.
    Adaptive,
}

/// Raw question record as it appears in the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "question_stage")]
    pub stage: QuestionStage,
    pub primary_trait: String,
    #[serde(default)]
    pub secondary_traits: Vec<String>,
    #[serde(default = "default_information_value")]
    pub information_value: f64,
}

fn default_information_value() -> f64 {
    1.0
}

/// An immutable question with its traits resolved to canonical indices.
#[derive(Debug, Clone)]
pub struct Question {
    id: String,
    text: String,
    category: Option<String>,
    stage: QuestionStage,
    primary_trait: usize,
    secondary_traits: Vec<usize>,
    information_value: f64,
}

impl Question {
    /// Resolves a raw record against the trait catalog.
    ///
    /// # Errors
    ///
    /// - `UnknownTrait` if the primary or a secondary trait is outside the
    ///   canonical set
    /// - `InvalidInformationValue` if the weight multiplier is not positive
    pub fn resolve(record: QuestionRecord, traits: &TraitCatalog) -> Result<Self, CatalogError> {
        let primary_trait =
            traits
                .index_of(&record.primary_trait)
                .ok_or_else(|| CatalogError::UnknownTrait {
                    owner: record.id.clone(),
                    trait_name: record.primary_trait.clone(),
                })?;

        let mut secondary_traits = Vec::with_capacity(record.secondary_traits.len());
        for name in &record.secondary_traits {
            let index = traits
                .index_of(name)
                .ok_or_else(|| CatalogError::UnknownTrait {
                    owner: record.id.clone(),
                    trait_name: name.clone(),
                })?;
            secondary_traits.push(index);
        }

        if !record.information_value.is_finite() || record.information_value <= 0.0 {
            return Err(CatalogError::InvalidInformationValue {
                question: record.id.clone(),
                value: record.information_value,
            });
        }

        Ok(Self {
            id: record.id,
            text: record.text,
            category: record.category,
            stage: record.stage,
            primary_trait,
            secondary_traits,
            information_value: record.information_value,
        })
    }

    /// Returns the question id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the question text shown to the user.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the optional category tag.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the phase this question belongs to.
    pub fn stage(&self) -> QuestionStage {
        self.stage
    }

    /// Canonical index of the primary trait.
    pub fn primary_trait(&self) -> usize {
        self.primary_trait
    }

    /// Canonical indices of the secondary traits.
    pub fn secondary_traits(&self) -> &[usize] {
        &self.secondary_traits
    }

    /// Positive multiplier applied to this question's information gain.
    pub fn information_value(&self) -> f64 {
        self.information_value
    }
}
