//! Building rated attribute sets from user or file input.
//!
//! Nothing here scores anything: intake produces the [`RatedAttributeSet`]s
//! that the affinity engine consumes, enforcing the per-subject budgets on the
//! way in.

mod budget;
mod import;

pub use budget::{
    normalize_attribute_name, normalize_subject, parse_entry, BudgetViolation, SubjectBudget,
    SubjectBuilder,
};
pub use import::{import_candidates, import_candidates_from_path, CandidateImportError};

use serde::{Deserialize, Serialize};

use crate::affinity::RatedAttributeSet;

/// A named second subject, e.g. one applicant's self-rated traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub attributes: RatedAttributeSet,
}
