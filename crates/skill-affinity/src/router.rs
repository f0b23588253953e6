use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::affinity::{AffinityEngine, AffinityLevel, AffinityResult, RatedAttributeSet};
use crate::config::BudgetConfig;
use crate::error::{AppError, SubjectRole};
use crate::intake::{normalize_subject, Candidate};
use crate::ranking::{gap_analysis, rank_candidates, CandidateRanking, RankingOptions, SkillGap};
use crate::report::AffinityReportView;

/// Shared state for the affinity endpoints; the engine itself is stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffinityService {
    engine: AffinityEngine,
    budgets: BudgetConfig,
}

impl AffinityService {
    pub fn new(budgets: BudgetConfig) -> Self {
        Self {
            engine: AffinityEngine::new(),
            budgets,
        }
    }

    /// Normalize names the way builder input is normalized, then apply the
    /// role's budget unless the caller waived it.
    fn prepare(
        &self,
        role: SubjectRole,
        set: &RatedAttributeSet,
        enforce_budget: bool,
    ) -> Result<RatedAttributeSet, AppError> {
        let budget = match role {
            SubjectRole::Requirements => self.budgets.requirements,
            SubjectRole::Profile => self.budgets.profile,
        };
        let normalized =
            normalize_subject(set).map_err(|violation| AppError::budget(role, violation))?;
        if enforce_budget {
            budget
                .check(&normalized)
                .map_err(|violation| AppError::budget(role, violation))?;
        }
        Ok(normalized)
    }

    /// Score one profile and keep the full engine result.
    pub fn evaluate(&self, request: ScoreRequest) -> Result<ScoreOutcome, AppError> {
        let requirements = self.prepare(
            SubjectRole::Requirements,
            &request.requirements,
            request.enforce_budget,
        )?;
        let profile = self.prepare(SubjectRole::Profile, &request.profile, request.enforce_budget)?;

        Ok(ScoreOutcome {
            result: self.engine.compute(&requirements, &profile),
            gap: gap_analysis(&requirements, &profile),
        })
    }

    pub fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, AppError> {
        self.evaluate(request).map(ScoreOutcome::into_response)
    }

    pub fn rank(&self, request: RankRequest) -> Result<CandidateRanking, AppError> {
        let requirements = self.prepare(
            SubjectRole::Requirements,
            &request.requirements,
            request.enforce_budget,
        )?;
        let candidates = request
            .candidates
            .iter()
            .map(|candidate| -> Result<Candidate, AppError> {
                Ok(Candidate {
                    id: candidate.id.clone(),
                    attributes: self.prepare(
                        SubjectRole::Profile,
                        &candidate.attributes,
                        request.enforce_budget,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let defaults = RankingOptions::default();
        let options = RankingOptions {
            limit: request.limit.unwrap_or(defaults.limit),
            recommend_at: request.recommend_at.unwrap_or(defaults.recommend_at),
        };
        Ok(rank_candidates(&requirements, &candidates, &options))
    }
}

/// Engine result plus gap analysis for one scored profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub result: AffinityResult,
    pub gap: SkillGap,
}

impl ScoreOutcome {
    pub fn into_response(self) -> ScoreResponse {
        ScoreResponse {
            report: self.result.report_view(),
            gap: self.gap,
        }
    }
}

fn enforce_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub requirements: RatedAttributeSet,
    pub profile: RatedAttributeSet,
    #[serde(default = "enforce_by_default")]
    pub enforce_budget: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub report: AffinityReportView,
    pub gap: SkillGap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub requirements: RatedAttributeSet,
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub recommend_at: Option<AffinityLevel>,
    #[serde(default = "enforce_by_default")]
    pub enforce_budget: bool,
}

/// Router exposing scoring and ranking over JSON.
pub fn affinity_router(service: Arc<AffinityService>) -> Router {
    Router::new()
        .route("/api/v1/affinity/score", post(score_handler))
        .route("/api/v1/affinity/rank", post(rank_handler))
        .with_state(service)
}

pub(crate) async fn score_handler(
    State(service): State<Arc<AffinityService>>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let response = service.score(request)?;
    info!(
        level = response.report.level.as_str(),
        score = response.report.score,
        "affinity scored"
    );
    Ok(Json(response))
}

pub(crate) async fn rank_handler(
    State(service): State<Arc<AffinityService>>,
    Json(request): Json<RankRequest>,
) -> Result<Json<CandidateRanking>, AppError> {
    service.rank(request).map(Json)
}
