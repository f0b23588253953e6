use crate::infra::load_subject;
use clap::Args;
use skill_affinity::config::{AppConfig, BudgetConfig};
use skill_affinity::error::{AppError, SubjectRole};
use skill_affinity::intake::{import_candidates, import_candidates_from_path, SubjectBuilder};
use skill_affinity::ranking::{CandidateRanking, SkillGap};
use skill_affinity::report::render_text;
use skill_affinity::router::{AffinityService, RankRequest, ScoreRequest};
use skill_affinity::{compute_affinity, AffinityLevel, RatedAttributeSet};
use std::io::Cursor;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Desired trait as name=weight (weight 1-3); repeat for each trait
    #[arg(long = "require", value_name = "NAME=WEIGHT")]
    pub(crate) require: Vec<String>,
    /// Candidate trait as name=weight (weight 1-3); repeat for each trait
    #[arg(long = "offer", value_name = "NAME=WEIGHT")]
    pub(crate) offer: Vec<String>,
    /// JSON object of requirements, used instead of --require
    #[arg(long)]
    pub(crate) requirements_file: Option<PathBuf>,
    /// JSON object of candidate traits, used instead of --offer
    #[arg(long)]
    pub(crate) profile_file: Option<PathBuf>,
    /// Print the JSON report instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the attribute count and weight budget checks
    #[arg(long)]
    pub(crate) no_budget: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Desired trait as name=weight (weight 1-3); repeat for each trait
    #[arg(long = "require", value_name = "NAME=WEIGHT")]
    pub(crate) require: Vec<String>,
    /// JSON object of requirements, used instead of --require
    #[arg(long)]
    pub(crate) requirements_file: Option<PathBuf>,
    /// CSV export with candidate,attribute,weight columns
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Maximum number of candidates to list
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Lowest level that counts as a recommendation
    #[arg(long, value_parser = crate::infra::parse_level)]
    pub(crate) recommend_at: Option<AffinityLevel>,
    /// Print the JSON ranking instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the attribute count and weight budget checks
    #[arg(long)]
    pub(crate) no_budget: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Only show the individual scoring scenarios.
    #[arg(long)]
    pub(crate) skip_ranking: bool,
}

fn load_budgets() -> Result<BudgetConfig, AppError> {
    Ok(AppConfig::load()?.budgets)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let requirements = load_subject(
        &args.require,
        args.requirements_file.as_deref(),
        SubjectRole::Requirements,
    )?;
    let profile = load_subject(
        &args.offer,
        args.profile_file.as_deref(),
        SubjectRole::Profile,
    )?;

    let service = AffinityService::new(load_budgets()?);
    let outcome = service.evaluate(ScoreRequest {
        requirements,
        profile,
        enforce_budget: !args.no_budget,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.into_response())?);
        return Ok(());
    }

    println!("{}", render_text(&outcome.result));
    render_gap(&outcome.gap, "");
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let requirements = load_subject(
        &args.require,
        args.requirements_file.as_deref(),
        SubjectRole::Requirements,
    )?;
    let candidates = import_candidates_from_path(&args.candidates)?;

    let service = AffinityService::new(load_budgets()?);
    let ranking = service.rank(RankRequest {
        requirements,
        candidates,
        limit: args.limit,
        recommend_at: args.recommend_at,
        enforce_budget: !args.no_budget,
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
    } else {
        render_ranking(&ranking);
    }
    Ok(())
}

const DEMO_CANDIDATES: &str = "\
candidate,attribute,weight
sofia,Marketing,3
sofia,Branding,2
sofia,Social Media,3
diego,Excel,3
diego,Branding,1
lucia,Marketing,1
mateo,Marketing,2
mateo,Branding,2
mateo,Copywriting,3
";

struct Scenario {
    title: &'static str,
    requirements: &'static [&'static str],
    profile: &'static [&'static str],
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        title: "Broad overlap with a premium match",
        requirements: &["rust=3", "sql=2", "docker=2", "git=1"],
        profile: &["rust=3", "sql=3", "docker=2", "git=2", "python=1"],
    },
    Scenario {
        title: "Lone match where the candidate outrates a light requirement",
        requirements: &["a=1", "b=3", "c=3"],
        profile: &["a=3"],
    },
    Scenario {
        title: "Lone match on a critical trait the candidate rates weakly",
        requirements: &["x=3", "y=2", "z=1"],
        profile: &["x=1"],
    },
];

fn build_subject(
    entries: &[&str],
    mut builder: SubjectBuilder,
    role: SubjectRole,
) -> Result<RatedAttributeSet, AppError> {
    for entry in entries {
        builder
            .add_entry(entry)
            .map_err(|violation| AppError::budget(role, violation))?;
    }
    Ok(builder.build())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let budgets = BudgetConfig::default();

    println!("Skill affinity demo");
    for (index, scenario) in SCENARIOS.iter().enumerate() {
        let requirements = build_subject(
            scenario.requirements,
            SubjectBuilder::new(budgets.requirements),
            SubjectRole::Requirements,
        )?;
        let profile = build_subject(
            scenario.profile,
            SubjectBuilder::new(budgets.profile),
            SubjectRole::Profile,
        )?;

        println!("\n{}. {}", index + 1, scenario.title);
        println!("   requirements: {}", scenario.requirements.join(", "));
        println!("   profile:      {}", scenario.profile.join(", "));
        println!("{}", render_text(&compute_affinity(&requirements, &profile)));
    }

    if args.skip_ranking {
        return Ok(());
    }

    println!("\nCandidate ranking demo");
    let requirements = build_subject(
        &["marketing=3", "branding=2", "social media=2"],
        SubjectBuilder::new(budgets.requirements),
        SubjectRole::Requirements,
    )?;
    let candidates = import_candidates(Cursor::new(DEMO_CANDIDATES))?;
    let ranking = AffinityService::new(budgets).rank(RankRequest {
        requirements,
        candidates,
        limit: None,
        recommend_at: None,
        enforce_budget: true,
    })?;
    render_ranking(&ranking);

    Ok(())
}

pub(crate) fn render_ranking(ranking: &CandidateRanking) {
    println!(
        "Ranked {} of {} candidates ({} recommended, average score {:.1})",
        ranking.candidates.len(),
        ranking.total,
        ranking.recommended,
        ranking.average_score
    );

    let distribution: Vec<String> = ranking
        .distribution
        .iter()
        .map(|entry| format!("{} {}", entry.level.label(), entry.count))
        .collect();
    println!("Distribution: {}", distribution.join(" | "));

    for entry in &ranking.candidates {
        let marker = if entry.recommended {
            " [recommended]"
        } else {
            ""
        };
        println!(
            "{:>3}. {} - {} (score {:.1}, coverage {:.0}%){}",
            entry.rank,
            entry.candidate_id,
            entry.affinity.level.label(),
            entry.affinity.rounded_score(),
            entry.affinity.coverage_percent(),
            marker
        );
        render_gap(&entry.gap, "     ");
    }
}

fn render_gap(gap: &SkillGap, indent: &str) {
    if gap.is_empty() {
        println!("{indent}Gaps: none");
        return;
    }

    if !gap.missing.is_empty() {
        let missing: Vec<String> = gap
            .missing
            .iter()
            .map(|entry| format!("{} ({})", entry.name, entry.required.value()))
            .collect();
        println!("{indent}Missing: {}", missing.join(", "));
    }
    if !gap.insufficient.is_empty() {
        let short: Vec<String> = gap
            .insufficient
            .iter()
            .map(|entry| {
                format!(
                    "{} ({} of {})",
                    entry.name,
                    entry.actual.value(),
                    entry.required.value()
                )
            })
            .collect();
        println!("{indent}Below requirement: {}", short.join(", "));
    }
}
