use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rating on the shared 1-3 scale used by both subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeWeight {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl AttributeWeight {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.value())
    }

    pub const fn label(self) -> &'static str {
        match self {
            AttributeWeight::Low => "low",
            AttributeWeight::Medium => "medium",
            AttributeWeight::High => "high",
        }
    }
}

/// Raised when a weight outside 1-3 reaches a typed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("attribute weight must be 1, 2 or 3 (got {0})")]
pub struct InvalidWeight(pub i64);

impl TryFrom<i64> for AttributeWeight {
    type Error = InvalidWeight;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AttributeWeight::Low),
            2 => Ok(AttributeWeight::Medium),
            3 => Ok(AttributeWeight::High),
            other => Err(InvalidWeight(other)),
        }
    }
}

impl TryFrom<u8> for AttributeWeight {
    type Error = InvalidWeight;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl fmt::Display for AttributeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for AttributeWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for AttributeWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        AttributeWeight::try_from(raw).map_err(de::Error::custom)
    }
}

/// Insertion-ordered mapping from attribute name to weight.
///
/// The first subject's order drives the order of the match breakdown, so this
/// is kept as an association list rather than a hash map. Sets are small
/// (single digits) and lookups are linear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatedAttributeSet {
    entries: Vec<(String, AttributeWeight)>,
}

impl RatedAttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an attribute. An overwritten name keeps its
    /// original position and the previous weight is returned.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        weight: AttributeWeight,
    ) -> Option<AttributeWeight> {
        let name = name.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(existing, weight));
        }
        self.entries.push((name, weight));
        None
    }

    pub fn with(mut self, name: impl Into<String>, weight: AttributeWeight) -> Self {
        self.insert(name, weight);
        self
    }

    pub fn get(&self, name: &str) -> Option<AttributeWeight> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, weight)| *weight)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeWeight)> + '_ {
        self.entries
            .iter()
            .map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn total_weight(&self) -> u32 {
        self.entries
            .iter()
            .map(|(_, weight)| u32::from(weight.value()))
            .sum()
    }
}

impl<S: Into<String>> FromIterator<(S, AttributeWeight)> for RatedAttributeSet {
    fn from_iter<I: IntoIterator<Item = (S, AttributeWeight)>>(iter: I) -> Self {
        let mut set = RatedAttributeSet::new();
        for (name, weight) in iter {
            set.insert(name, weight);
        }
        set
    }
}

impl Serialize for RatedAttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, weight) in &self.entries {
            map.serialize_entry(name, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RatedAttributeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = RatedAttributeSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute names to weights between 1 and 3")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut set = RatedAttributeSet::new();
                while let Some((name, weight)) = access.next_entry::<String, AttributeWeight>()? {
                    if set.contains(&name) {
                        return Err(de::Error::custom(format!(
                            "duplicate attribute '{name}'"
                        )));
                    }
                    set.insert(name, weight);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Discrete affinity classification, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AffinityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl AffinityLevel {
    pub const fn ordered() -> [AffinityLevel; 4] {
        [
            AffinityLevel::Low,
            AffinityLevel::Medium,
            AffinityLevel::High,
            AffinityLevel::VeryHigh,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AffinityLevel::Low => "low",
            AffinityLevel::Medium => "medium",
            AffinityLevel::High => "high",
            AffinityLevel::VeryHigh => "very-high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AffinityLevel::Low => "Low",
            AffinityLevel::Medium => "Medium",
            AffinityLevel::High => "High",
            AffinityLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for AffinityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown affinity level '{0}' (expected low, medium, high or very-high)")]
pub struct UnknownAffinityLevel(pub String);

impl FromStr for AffinityLevel {
    type Err = UnknownAffinityLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "low" => Ok(AffinityLevel::Low),
            "medium" => Ok(AffinityLevel::Medium),
            "high" => Ok(AffinityLevel::High),
            "very-high" | "veryhigh" => Ok(AffinityLevel::VeryHigh),
            _ => Err(UnknownAffinityLevel(value.to_string())),
        }
    }
}

/// How the proportional factor was used for a single match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorApplication {
    Applied { factor: f64 },
    /// Single-match value: the factor was applied and the result is bounded
    /// by `cap`, whether or not the bound was reached.
    Capped { factor: f64, cap: f64 },
    NotApplicable,
}

impl FactorApplication {
    pub fn factor(&self) -> Option<f64> {
        match self {
            FactorApplication::Applied { factor } | FactorApplication::Capped { factor, .. } => {
                Some(*factor)
            }
            FactorApplication::NotApplicable => None,
        }
    }

    /// True when `value` sits at the cap, i.e. the bound changed the result.
    pub fn cap_reached(&self, value: f64) -> bool {
        matches!(self, FactorApplication::Capped { cap, .. } if value >= *cap)
    }
}

/// Resolved contribution of one attribute present in both subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub name: String,
    pub subject1_weight: AttributeWeight,
    pub subject2_weight: AttributeWeight,
    pub base_value: f64,
    pub final_value: f64,
    pub is_premium_match: bool,
    pub is_value_two_match: bool,
    pub is_superior_rating: bool,
    pub is_special_case: bool,
    pub is_single_match_case: bool,
    pub proportional_factor_applied: FactorApplication,
}

/// Complete outcome of one affinity computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityResult {
    pub level: AffinityLevel,
    pub total_score: f64,
    pub percentage: f64,
    pub match_count: usize,
    pub is_single_match_case: bool,
    pub is_special_case_3_to_1: bool,
    pub subject1_size: usize,
    pub subject2_size: usize,
    pub matches: Vec<MatchEntry>,
    pub has_premium_match: bool,
    pub value_two_match_count: usize,
    pub superior_rating_count: usize,
    pub proportional_factor: f64,
    pub coverage_factor: f64,
    pub coverage: f64,
}

impl AffinityResult {
    /// Total score rounded to one decimal, as shown in reports.
    pub fn rounded_score(&self) -> f64 {
        round_to_tenth(self.total_score)
    }

    pub fn coverage_percent(&self) -> f64 {
        round_to_tenth(self.coverage * 100.0)
    }

    pub fn is_normal_case(&self) -> bool {
        !self.is_single_match_case && !self.is_special_case_3_to_1
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    round_to_places(value, 1)
}

/// Rounds the exact binary value once, as `{:.N}` formatting does, so
/// 3.8499999999999996 stays 3.8 instead of drifting up through `x * 10`.
pub(crate) fn round_to_places(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_rejects_values_outside_scale() {
        assert_eq!(AttributeWeight::try_from(0u8), Err(InvalidWeight(0)));
        assert_eq!(AttributeWeight::try_from(4i64), Err(InvalidWeight(4)));
        assert_eq!(AttributeWeight::try_from(2u8), Ok(AttributeWeight::Medium));
    }

    #[test]
    fn set_keeps_insertion_order_and_position_on_overwrite() {
        let mut set = RatedAttributeSet::new()
            .with("rust", AttributeWeight::High)
            .with("sql", AttributeWeight::Low)
            .with("docker", AttributeWeight::Medium);

        let previous = set.insert("sql", AttributeWeight::High);

        assert_eq!(previous, Some(AttributeWeight::Low));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["rust", "sql", "docker"]);
        assert_eq!(set.get("sql"), Some(AttributeWeight::High));
        assert_eq!(set.total_weight(), 8);
    }

    #[test]
    fn set_deserializes_in_document_order() {
        let set: RatedAttributeSet =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 3, "mid": 2}"#).expect("valid set");

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        let json = serde_json::to_string(&set).expect("serializes");
        assert_eq!(json, r#"{"zeta":1,"alpha":3,"mid":2}"#);
    }

    #[test]
    fn set_rejects_out_of_range_weights() {
        let err = serde_json::from_str::<RatedAttributeSet>(r#"{"rust": 5}"#)
            .expect_err("weight 5 is invalid");
        assert!(err.to_string().contains("must be 1, 2 or 3"));
    }

    #[test]
    fn set_rejects_repeated_keys() {
        let err = serde_json::from_str::<RatedAttributeSet>(r#"{"rust": 3, "rust": 1}"#)
            .expect_err("repeated key");
        assert!(err.to_string().contains("duplicate attribute 'rust'"));
    }

    #[test]
    fn level_parses_common_spellings() {
        assert_eq!("very_high".parse::<AffinityLevel>(), Ok(AffinityLevel::VeryHigh));
        assert_eq!(" High ".parse::<AffinityLevel>(), Ok(AffinityLevel::High));
        assert!("excellent".parse::<AffinityLevel>().is_err());
        assert!(AffinityLevel::VeryHigh > AffinityLevel::High);
    }

    #[test]
    fn rounding_matches_decimal_formatting() {
        assert_eq!(round_to_tenth(3.8499999999999996), 3.8);
        assert_eq!(round_to_tenth(3.85), 3.9);
        assert_eq!(round_to_tenth(3.0 * (1.0 + 7.0 / 30.0)), 3.7);
        assert_eq!(round_to_places(1.0 + 7.0 / 30.0, 2), 1.23);
    }

    #[test]
    fn level_serializes_in_kebab_case() {
        let json = serde_json::to_string(&AffinityLevel::VeryHigh).expect("serializes");
        assert_eq!(json, "\"very-high\"");
    }
}
