//! Weighted affinity scoring between two rated attribute sets.
//!
//! The first subject (typically the organization's desired traits) drives
//! match order and coverage; the second subject (the candidate's self-rated
//! traits) drives the proportional factor. Every call is a pure function of
//! its two inputs.

mod classifier;
pub mod domain;
mod factors;
mod matching;
mod resolver;

#[cfg(test)]
mod tests;

pub use domain::{
    AffinityLevel, AffinityResult, AttributeWeight, FactorApplication, InvalidWeight, MatchEntry,
    RatedAttributeSet, UnknownAffinityLevel,
};

use classifier::{aggregate, classify, LevelSignals};
use factors::compute_factors;
use matching::{collect_matches, detect_special_cases};
use resolver::resolve_match;
use tracing::debug;

/// Stateless scorer; holds no data between calls and can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffinityEngine;

impl AffinityEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(
        &self,
        subject1: &RatedAttributeSet,
        subject2: &RatedAttributeSet,
    ) -> AffinityResult {
        let subject1_size = subject1.len();
        let subject2_size = subject2.len();

        let raw_matches = collect_matches(subject1, subject2);
        let cases = detect_special_cases(&raw_matches, subject1_size);
        let factors = compute_factors(raw_matches.len(), subject1_size, subject2_size);

        let matches: Vec<MatchEntry> = raw_matches
            .iter()
            .map(|raw| resolve_match(raw, cases, factors.proportional))
            .collect();

        let totals = aggregate(&matches, cases, factors.coverage_factor);
        let signals = LevelSignals::from_entries(&matches, cases, totals, factors.coverage);
        let level = classify(&signals);

        debug!(
            subject1_size,
            subject2_size,
            match_count = matches.len(),
            single_match = cases.single_match,
            three_to_one = cases.three_to_one,
            total_score = totals.total_score,
            level = level.as_str(),
            "affinity computed"
        );

        AffinityResult {
            level,
            total_score: totals.total_score,
            percentage: totals.percentage,
            match_count: matches.len(),
            is_single_match_case: cases.single_match,
            is_special_case_3_to_1: cases.three_to_one,
            subject1_size,
            subject2_size,
            has_premium_match: signals.has_premium_match,
            value_two_match_count: signals.value_two_match_count,
            superior_rating_count: signals.superior_rating_count,
            proportional_factor: factors.proportional,
            coverage_factor: factors.coverage_factor,
            coverage: factors.coverage,
            matches,
        }
    }
}

/// Convenience wrapper around [`AffinityEngine::compute`].
pub fn compute_affinity(subject1: &RatedAttributeSet, subject2: &RatedAttributeSet) -> AffinityResult {
    AffinityEngine.compute(subject1, subject2)
}
