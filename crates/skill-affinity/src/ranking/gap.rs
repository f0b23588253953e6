use serde::{Deserialize, Serialize};

use crate::affinity::{AttributeWeight, RatedAttributeSet};

/// Requirement the profile does not mention at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingAttribute {
    pub name: String,
    pub required: AttributeWeight,
}

/// Requirement the profile mentions at a lower weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientAttribute {
    pub name: String,
    pub required: AttributeWeight,
    pub actual: AttributeWeight,
    pub gap: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub missing: Vec<MissingAttribute>,
    pub insufficient: Vec<InsufficientAttribute>,
}

impl SkillGap {
    pub fn total_gaps(&self) -> usize {
        self.missing.len() + self.insufficient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_gaps() == 0
    }
}

/// Compare a profile against requirements, in requirement order.
pub fn gap_analysis(requirements: &RatedAttributeSet, profile: &RatedAttributeSet) -> SkillGap {
    let mut gap = SkillGap::default();

    for (name, required) in requirements.iter() {
        match profile.get(name) {
            None => gap.missing.push(MissingAttribute {
                name: name.to_string(),
                required,
            }),
            Some(actual) if actual < required => gap.insufficient.push(InsufficientAttribute {
                name: name.to_string(),
                required,
                actual,
                gap: required.value() - actual.value(),
            }),
            Some(_) => {}
        }
    }

    gap
}
