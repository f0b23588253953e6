use serde::{Deserialize, Serialize};

use crate::affinity::{AttributeWeight, RatedAttributeSet};

/// Limits placed on a subject while it is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectBudget {
    pub max_attributes: usize,
    pub max_weight_total: u32,
}

impl SubjectBudget {
    /// Desired traits declared by the organization.
    pub const fn requirements() -> Self {
        Self {
            max_attributes: 5,
            max_weight_total: 10,
        }
    }

    /// Self-rated traits declared by the candidate.
    pub const fn profile() -> Self {
        Self {
            max_attributes: 8,
            max_weight_total: 15,
        }
    }

    /// No limits; used where only names and weights need validating.
    pub const fn unbounded() -> Self {
        Self {
            max_attributes: usize::MAX,
            max_weight_total: u32::MAX,
        }
    }

    /// Validate a set that was assembled elsewhere (e.g. decoded from JSON).
    pub fn check(&self, set: &RatedAttributeSet) -> Result<(), BudgetViolation> {
        if set.len() > self.max_attributes {
            return Err(BudgetViolation::AttributeLimit {
                limit: self.max_attributes,
            });
        }
        if let Some(name) = set.names().find(|name| name.trim().is_empty()) {
            return Err(BudgetViolation::EmptyName {
                raw: name.to_string(),
            });
        }
        let total = set.total_weight();
        if total > self.max_weight_total {
            return Err(BudgetViolation::WeightTotalExceeded {
                total,
                limit: self.max_weight_total,
            });
        }
        Ok(())
    }
}

/// Reasons an attribute could not be added to a subject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetViolation {
    #[error("attribute name must not be blank")]
    EmptyName { raw: String },
    #[error("attribute '{0}' was already added")]
    DuplicateAttribute(String),
    #[error("weight for '{name}' must be 1, 2 or 3 (got {value})")]
    InvalidWeight { name: String, value: i64 },
    #[error("no more than {limit} attributes may be declared")]
    AttributeLimit { limit: usize },
    #[error("weight {requested} for '{name}' exceeds the remaining budget of {remaining}")]
    WeightBudgetExceeded {
        name: String,
        requested: u8,
        remaining: u32,
    },
    #[error("total weight {total} exceeds the budget of {limit}")]
    WeightTotalExceeded { total: u32, limit: u32 },
    #[error("expected 'name=weight', got '{0}'")]
    MalformedEntry(String),
}

/// Incrementally collects a subject while enforcing its budget.
///
/// A rejected `add` leaves the builder untouched so interactive callers can
/// prompt again.
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    budget: SubjectBudget,
    set: RatedAttributeSet,
}

impl SubjectBuilder {
    pub fn new(budget: SubjectBudget) -> Self {
        Self {
            budget,
            set: RatedAttributeSet::new(),
        }
    }

    pub fn budget(&self) -> SubjectBudget {
        self.budget
    }

    pub fn add(&mut self, name: &str, weight: i64) -> Result<AttributeWeight, BudgetViolation> {
        let normalized = normalize_attribute_name(name);
        if normalized.is_empty() {
            return Err(BudgetViolation::EmptyName {
                raw: name.to_string(),
            });
        }
        if self.set.contains(&normalized) {
            return Err(BudgetViolation::DuplicateAttribute(normalized));
        }
        if self.remaining_attributes() == 0 {
            return Err(BudgetViolation::AttributeLimit {
                limit: self.budget.max_attributes,
            });
        }

        let parsed =
            AttributeWeight::try_from(weight).map_err(|_| BudgetViolation::InvalidWeight {
                name: normalized.clone(),
                value: weight,
            })?;

        let remaining = self.remaining_weight();
        if u32::from(parsed.value()) > remaining {
            return Err(BudgetViolation::WeightBudgetExceeded {
                name: normalized,
                requested: parsed.value(),
                remaining,
            });
        }

        self.set.insert(normalized, parsed);
        Ok(parsed)
    }

    /// Parse and add a `name=weight` entry.
    pub fn add_entry(&mut self, raw: &str) -> Result<AttributeWeight, BudgetViolation> {
        let (name, weight) = parse_entry(raw)?;
        self.add(&name, weight)
    }

    pub fn remaining_attributes(&self) -> usize {
        self.budget.max_attributes.saturating_sub(self.set.len())
    }

    pub fn remaining_weight(&self) -> u32 {
        self.budget
            .max_weight_total
            .saturating_sub(self.set.total_weight())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_attributes() == 0 || self.remaining_weight() == 0
    }

    pub fn build(self) -> RatedAttributeSet {
        self.set
    }
}

/// Attribute names are matched after trimming and lowercasing.
pub fn normalize_attribute_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Rebuild a decoded set so its names go through the same normalization
/// and duplicate check as builder input. Order is preserved.
pub fn normalize_subject(set: &RatedAttributeSet) -> Result<RatedAttributeSet, BudgetViolation> {
    let mut builder = SubjectBuilder::new(SubjectBudget::unbounded());
    for (name, weight) in set.iter() {
        builder.add(name, i64::from(weight.value()))?;
    }
    Ok(builder.build())
}

/// Split a `name=weight` pair; the weight is range-checked later.
pub fn parse_entry(raw: &str) -> Result<(String, i64), BudgetViolation> {
    let (name, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| BudgetViolation::MalformedEntry(raw.to_string()))?;
    let weight = weight
        .trim()
        .parse::<i64>()
        .map_err(|_| BudgetViolation::MalformedEntry(raw.to_string()))?;
    Ok((name.trim().to_string(), weight))
}
