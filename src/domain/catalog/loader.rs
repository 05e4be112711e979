//! Catalog loading and validation.
//!
//! The catalog is loaded once at process start and is immutable afterwards.
//! Any structural failure here is fatal: a missing file, a malformed record,
//! an unknown trait reference, or an empty seed list aborts startup rather
//! than surfacing as a per-request error.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::{Department, DepartmentRecord, Question, QuestionRecord, QuestionStage, TraitCatalog};

/// Fatal catalog errors. None of these are recoverable per-request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{owner}' references unknown trait '{trait_name}'")]
    UnknownTrait { owner: String, trait_name: String },

    #[error("Department '{department}' has weight {weight} for trait '{trait_name}', expected [0, 1]")]
    InvalidWeight {
        department: String,
        trait_name: String,
        weight: f64,
    },

    #[error("Question '{question}' has non-positive information value {value}")]
    InvalidInformationValue { question: String, value: f64 },

    #[error("Duplicate department id '{id}'")]
    DuplicateDepartment { id: String },

    #[error("Duplicate question id '{id}'")]
    DuplicateQuestion { id: String },

    #[error("Seed question '{id}' is not marked with the seed stage")]
    MisplacedSeedQuestion { id: String },

    #[error("Catalog contains no departments")]
    NoDepartments,

    #[error("Catalog contains no seed questions")]
    NoSeedQuestions,
}

#[derive(Debug, Deserialize)]
struct DepartmentsFile {
    departments: Vec<DepartmentRecord>,
}

#[derive(Debug, Deserialize)]
struct QuestionsFile {
    seed_questions: Vec<QuestionRecord>,
    question_bank: Vec<QuestionRecord>,
}

/// Immutable data catalog: departments, questions, and seed order.
///
/// # Invariants
///
/// - At least one department and one seed question exist
/// - All ids are unique within their kind
/// - Every trait reference resolves to the canonical trait set
/// - `questions` preserves file load order (bank first, then seeds), which
///   fixes the tie-breaking order of adaptive selection
#[derive(Debug, Clone)]
pub struct Catalog {
    traits: TraitCatalog,
    departments: Vec<Department>,
    department_index: HashMap<String, usize>,
    questions: Vec<Question>,
    question_index: HashMap<String, usize>,
    seed_order: Vec<usize>,
}

impl Catalog {
    /// Loads and validates the catalog from its two JSON files.
    pub fn load(
        departments_path: impl AsRef<Path>,
        questions_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let departments: DepartmentsFile = read_json(departments_path.as_ref())?;
        let questions: QuestionsFile = read_json(questions_path.as_ref())?;

        let catalog = Self::from_records(
            TraitCatalog::canonical(),
            departments.departments,
            questions.question_bank,
            questions.seed_questions,
        )?;

        info!(
            departments = catalog.departments.len(),
            questions = catalog.questions.len(),
            seed_questions = catalog.seed_order.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Builds a catalog from already-parsed records.
    ///
    /// Question load order is preserved: the adaptive bank first, then the
    /// seed list. This order is observable through adaptive tie-breaking.
    pub fn from_records(
        traits: TraitCatalog,
        departments: Vec<DepartmentRecord>,
        question_bank: Vec<QuestionRecord>,
        seed_questions: Vec<QuestionRecord>,
    ) -> Result<Self, CatalogError> {
        if departments.is_empty() {
            return Err(CatalogError::NoDepartments);
        }
        if seed_questions.is_empty() {
            return Err(CatalogError::NoSeedQuestions);
        }

        let mut resolved_departments = Vec::with_capacity(departments.len());
        let mut department_index = HashMap::with_capacity(departments.len());
        for record in departments {
            let department = Department::resolve(record, &traits)?;
            if department_index
                .insert(department.id().to_string(), resolved_departments.len())
                .is_some()
            {
                return Err(CatalogError::DuplicateDepartment {
                    id: department.id().to_string(),
                });
            }
            resolved_departments.push(department);
        }

        let mut questions = Vec::with_capacity(question_bank.len() + seed_questions.len());
        let mut question_index = HashMap::with_capacity(questions.capacity());
        let mut push_question = |record: QuestionRecord,
                                 questions: &mut Vec<Question>,
                                 question_index: &mut HashMap<String, usize>|
         -> Result<usize, CatalogError> {
            let question = Question::resolve(record, &traits)?;
            if question_index.contains_key(question.id()) {
                return Err(CatalogError::DuplicateQuestion {
                    id: question.id().to_string(),
                });
            }
            let index = questions.len();
            question_index.insert(question.id().to_string(), index);
            questions.push(question);
            Ok(index)
        };

        for record in question_bank {
            push_question(record, &mut questions, &mut question_index)?;
        }

        let mut seed_order = Vec::with_capacity(seed_questions.len());
        for record in seed_questions {
            let index = push_question(record, &mut questions, &mut question_index)?;
            if questions[index].stage() != QuestionStage::Seed {
                return Err(CatalogError::MisplacedSeedQuestion {
                    id: questions[index].id().to_string(),
                });
            }
            seed_order.push(index);
        }

        Ok(Self {
            traits,
            departments: resolved_departments,
            department_index,
            questions,
            question_index,
            seed_order,
        })
    }

    /// The canonical trait set.
    pub fn traits(&self) -> &TraitCatalog {
        &self.traits
    }

    /// All departments in load order.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Department at `index` (load order).
    pub fn department(&self, index: usize) -> &Department {
        &self.departments[index]
    }

    /// Number of departments.
    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    /// Looks up a department by id.
    pub fn department_by_id(&self, id: &str) -> Option<&Department> {
        self.department_index.get(id).map(|&i| &self.departments[i])
    }

    /// All questions in load order (adaptive bank first, then seeds).
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a question by id.
    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.question_index.get(id).map(|&i| &self.questions[i])
    }

    /// Number of seed questions.
    pub fn seed_len(&self) -> usize {
        self.seed_order.len()
    }

    /// Seed question at position `index` of the fixed seed order.
    pub fn seed_question(&self, index: usize) -> &Question {
        &self.questions[self.seed_order[index]]
    }

    /// The first seed question. The seed list is non-empty by construction.
    pub fn first_seed(&self) -> &Question {
        self.seed_question(0)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
