//! Scoring a pool of candidates against one set of requirements.

mod gap;

pub use gap::{gap_analysis, InsufficientAttribute, MissingAttribute, SkillGap};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::affinity::{AffinityEngine, AffinityLevel, AffinityResult, RatedAttributeSet};
use crate::intake::Candidate;

pub const DEFAULT_RANKING_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingOptions {
    /// Maximum number of candidates returned; counts cover the whole pool.
    pub limit: usize,
    /// Lowest level that is flagged as recommended.
    pub recommend_at: AffinityLevel,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RANKING_LIMIT,
            recommend_at: AffinityLevel::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub candidate_id: String,
    pub recommended: bool,
    pub affinity: AffinityResult,
    pub gap: SkillGap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: AffinityLevel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRanking {
    pub total: usize,
    pub recommended: usize,
    pub average_score: f64,
    pub distribution: Vec<LevelCount>,
    pub candidates: Vec<RankedCandidate>,
}

impl CandidateRanking {
    pub fn count_at(&self, level: AffinityLevel) -> usize {
        self.distribution
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Rank candidates by level, then score, then coverage; ties fall back to
/// the candidate id so the order is stable across runs.
pub fn rank_candidates(
    requirements: &RatedAttributeSet,
    candidates: &[Candidate],
    options: &RankingOptions,
) -> CandidateRanking {
    let engine = AffinityEngine::new();

    let mut scored: Vec<RankedCandidate> = candidates
        .iter()
        .map(|candidate| {
            let affinity = engine.compute(requirements, &candidate.attributes);
            RankedCandidate {
                rank: 0,
                candidate_id: candidate.id.clone(),
                recommended: affinity.level >= options.recommend_at,
                gap: gap_analysis(requirements, &candidate.attributes),
                affinity,
            }
        })
        .collect();

    scored.sort_by(compare_ranked);

    let total = scored.len();
    let recommended = scored.iter().filter(|entry| entry.recommended).count();
    let average_score = if total == 0 {
        0.0
    } else {
        scored
            .iter()
            .map(|entry| entry.affinity.total_score)
            .sum::<f64>()
            / total as f64
    };
    let distribution = AffinityLevel::ordered()
        .into_iter()
        .map(|level| LevelCount {
            level,
            count: scored
                .iter()
                .filter(|entry| entry.affinity.level == level)
                .count(),
        })
        .collect();

    scored.truncate(options.limit);
    for (index, entry) in scored.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    info!(
        total,
        recommended,
        returned = scored.len(),
        "candidate pool ranked"
    );

    CandidateRanking {
        total,
        recommended,
        average_score,
        distribution,
        candidates: scored,
    }
}

fn compare_ranked(left: &RankedCandidate, right: &RankedCandidate) -> Ordering {
    right
        .affinity
        .level
        .cmp(&left.affinity.level)
        .then_with(|| right.affinity.total_score.total_cmp(&left.affinity.total_score))
        .then_with(|| right.affinity.coverage.total_cmp(&left.affinity.coverage))
        .then_with(|| left.candidate_id.cmp(&right.candidate_id))
}
