use super::domain::{AffinityLevel, MatchEntry};
use super::matching::SpecialCases;
use super::resolver::SINGLE_MATCH_CAP;

/// Score that maps to 100 percent.
pub(crate) const REFERENCE_SCORE: f64 = 15.0;
const SINGLE_MATCH_MEDIUM_THRESHOLD: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Aggregate {
    pub total_score: f64,
    pub percentage: f64,
}

pub(crate) fn aggregate(entries: &[MatchEntry], cases: SpecialCases, coverage_factor: f64) -> Aggregate {
    let mut total_score: f64 = entries.iter().map(|entry| entry.final_value).sum();

    if cases.is_normal() {
        total_score *= coverage_factor;
    }
    if cases.single_match {
        total_score = total_score.min(SINGLE_MATCH_CAP);
    }

    let percentage = if total_score > 0.0 {
        total_score / REFERENCE_SCORE * 100.0
    } else {
        0.0
    };

    Aggregate {
        total_score,
        percentage,
    }
}

/// Signals consulted by the level decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LevelSignals {
    pub cases: SpecialCases,
    pub match_count: usize,
    pub total_score: f64,
    pub percentage: f64,
    pub coverage: f64,
    pub has_premium_match: bool,
    pub value_two_match_count: usize,
    pub superior_rating_count: usize,
}

impl LevelSignals {
    pub(crate) fn from_entries(
        entries: &[MatchEntry],
        cases: SpecialCases,
        aggregate: Aggregate,
        coverage: f64,
    ) -> Self {
        Self {
            cases,
            match_count: entries.len(),
            total_score: aggregate.total_score,
            percentage: aggregate.percentage,
            coverage,
            has_premium_match: entries.iter().any(|entry| entry.is_premium_match),
            value_two_match_count: entries.iter().filter(|entry| entry.is_value_two_match).count(),
            superior_rating_count: entries.iter().filter(|entry| entry.is_superior_rating).count(),
        }
    }
}

/// First matching row wins: 3-vs-1, single-match, then the normal tiers.
pub(crate) fn classify(signals: &LevelSignals) -> AffinityLevel {
    if signals.cases.three_to_one {
        return AffinityLevel::Low;
    }

    if signals.cases.single_match {
        return if signals.total_score >= SINGLE_MATCH_MEDIUM_THRESHOLD {
            AffinityLevel::Medium
        } else {
            AffinityLevel::Low
        };
    }

    if is_very_high(signals) {
        AffinityLevel::VeryHigh
    } else if is_high(signals) {
        AffinityLevel::High
    } else if is_medium(signals) {
        AffinityLevel::Medium
    } else {
        AffinityLevel::Low
    }
}

fn is_very_high(s: &LevelSignals) -> bool {
    (s.match_count >= 3 && s.percentage >= 60.0)
        || (s.match_count >= 2 && s.total_score >= 8.0)
        || (s.has_premium_match && s.match_count >= 2 && s.total_score >= 7.0 && s.coverage >= 0.5)
        || (s.value_two_match_count >= 2 && s.match_count >= 2)
        || (s.superior_rating_count >= 2 && s.total_score >= 7.0 && s.coverage >= 0.5)
}

fn is_high(s: &LevelSignals) -> bool {
    (s.match_count >= 2 && s.percentage >= 40.0)
        || (s.match_count >= 1 && s.total_score >= 6.0)
        || (s.has_premium_match && s.match_count >= 1 && s.coverage >= 0.5)
        || (s.value_two_match_count >= 1 && s.match_count >= 2)
        || (s.superior_rating_count >= 1 && s.total_score >= 5.0 && s.coverage >= 0.4)
}

fn is_medium(s: &LevelSignals) -> bool {
    (s.match_count >= 1 && s.percentage >= 20.0) || s.total_score >= 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(match_count: usize, total_score: f64, coverage: f64) -> LevelSignals {
        LevelSignals {
            cases: SpecialCases::default(),
            match_count,
            total_score,
            percentage: total_score / REFERENCE_SCORE * 100.0,
            coverage,
            has_premium_match: false,
            value_two_match_count: 0,
            superior_rating_count: 0,
        }
    }

    #[test]
    fn three_to_one_is_always_low() {
        let mut signals = normal(1, 14.0, 1.0);
        signals.cases.three_to_one = true;
        signals.cases.single_match = true;
        assert_eq!(classify(&signals), AffinityLevel::Low);
    }

    #[test]
    fn single_match_uses_its_own_threshold() {
        let mut signals = normal(1, 2.5, 0.2);
        signals.cases.single_match = true;
        signals.superior_rating_count = 5;
        assert_eq!(classify(&signals), AffinityLevel::Medium);

        signals.total_score = 2.49;
        assert_eq!(classify(&signals), AffinityLevel::Low);
    }

    #[test]
    fn normal_tiers_cascade() {
        assert_eq!(classify(&normal(3, 9.0, 1.0)), AffinityLevel::VeryHigh);
        assert_eq!(classify(&normal(2, 8.0, 0.4)), AffinityLevel::VeryHigh);
        assert_eq!(classify(&normal(2, 6.0, 0.4)), AffinityLevel::High);
        assert_eq!(classify(&normal(1, 6.0, 0.2)), AffinityLevel::High);
        assert_eq!(classify(&normal(1, 3.0, 0.2)), AffinityLevel::Medium);
        assert_eq!(classify(&normal(0, 0.0, 0.0)), AffinityLevel::Low);
        assert_eq!(classify(&normal(2, 2.9, 0.4)), AffinityLevel::Low);
    }

    #[test]
    fn value_two_pairs_lift_level_regardless_of_score() {
        let mut signals = normal(2, 3.2, 1.0);
        signals.value_two_match_count = 2;
        assert_eq!(classify(&signals), AffinityLevel::VeryHigh);

        signals.value_two_match_count = 1;
        assert_eq!(classify(&signals), AffinityLevel::High);
    }

    #[test]
    fn premium_rules_require_coverage() {
        let mut signals = normal(1, 2.0, 0.5);
        signals.has_premium_match = true;
        assert_eq!(classify(&signals), AffinityLevel::High);

        signals.coverage = 0.49;
        assert_eq!(classify(&signals), AffinityLevel::Low);
    }

    #[test]
    fn superior_ratings_need_score_and_coverage() {
        let mut signals = normal(2, 7.0, 0.5);
        signals.superior_rating_count = 2;
        assert_eq!(classify(&signals), AffinityLevel::VeryHigh);

        let mut signals = normal(1, 5.0, 0.4);
        signals.superior_rating_count = 1;
        assert_eq!(classify(&signals), AffinityLevel::High);

        signals.coverage = 0.3;
        assert_eq!(classify(&signals), AffinityLevel::Medium);
    }
}
