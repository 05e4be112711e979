//! Immutable data catalog: trait axes, departments, questions, seed order.

mod department;
mod loader;
mod question;
mod traits;

pub use department::{Department, DepartmentRecord};
pub use loader::{Catalog, CatalogError};
pub use question::{Question, QuestionRecord, QuestionStage};
pub use traits::{TraitCatalog, TraitVector, CANONICAL_TRAITS};
