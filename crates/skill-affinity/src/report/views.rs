use serde::Serialize;

use crate::affinity::AffinityLevel;

/// Which rule set produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringCase {
    Normal,
    SingleMatch,
    ThreeToOne,
}

impl ScoringCase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::SingleMatch => "single match",
            Self::ThreeToOne => "lone 3-1 match",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchBreakdownView {
    pub name: String,
    pub subject1_weight: u8,
    pub subject2_weight: u8,
    pub base_value: f64,
    pub final_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportional_factor: Option<f64>,
    pub capped: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<&'static str>,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffinityReportView {
    pub level: AffinityLevel,
    pub level_label: &'static str,
    pub score: f64,
    pub percentage: f64,
    pub scoring_case: ScoringCase,
    pub match_count: usize,
    pub subject1_size: usize,
    pub subject2_size: usize,
    pub coverage_percent: f64,
    pub proportional_factor: f64,
    pub coverage_factor: f64,
    pub matches: Vec<MatchBreakdownView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}
