//! End-to-end scoring scenarios driven through the public crate surface.

mod common {
    use skill_affinity::intake::{SubjectBudget, SubjectBuilder};
    use skill_affinity::RatedAttributeSet;

    pub(super) fn requirements(entries: &[(&str, i64)]) -> RatedAttributeSet {
        build(SubjectBudget::requirements(), entries)
    }

    pub(super) fn profile(entries: &[(&str, i64)]) -> RatedAttributeSet {
        build(SubjectBudget::profile(), entries)
    }

    fn build(budget: SubjectBudget, entries: &[(&str, i64)]) -> RatedAttributeSet {
        let mut builder = SubjectBuilder::new(budget);
        for (name, weight) in entries {
            builder.add(name, *weight).expect("fixture fits budget");
        }
        builder.build()
    }
}

use common::{profile, requirements};
use skill_affinity::report::render_text;
use skill_affinity::{compute_affinity, AffinityEngine, AffinityLevel, RatedAttributeSet};

#[test]
fn organization_and_candidate_with_strong_overlap() {
    let company = requirements(&[("Rust", 3), ("SQL", 2), ("Docker", 2), ("Git", 1)]);
    let candidate = profile(&[("rust", 3), ("sql", 3), ("docker", 2), ("git", 2), ("excel", 1)]);

    let result = compute_affinity(&company, &candidate);

    assert_eq!(result.match_count, 4);
    assert_eq!(result.coverage, 1.0);
    assert!(result.has_premium_match);
    assert_eq!(result.superior_rating_count, 2);
    assert_eq!(result.level, AffinityLevel::VeryHigh);
}

#[test]
fn single_shared_trait_with_broad_requirements_is_capped() {
    let company = requirements(&[("a", 1), ("b", 3), ("c", 3)]);
    let candidate = profile(&[("a", 3)]);

    let result = AffinityEngine::new().compute(&company, &candidate);

    assert!(result.is_single_match_case);
    assert_eq!(result.total_score, 3.0);
    assert_eq!(result.level, AffinityLevel::Medium);
}

#[test]
fn empty_requirements_never_fail() {
    let result = compute_affinity(&RatedAttributeSet::new(), &profile(&[("x", 1)]));

    assert_eq!(result.match_count, 0);
    assert_eq!(result.total_score, 0.0);
    assert_eq!(result.level, AffinityLevel::Low);
}

#[test]
fn result_serializes_for_downstream_consumers() {
    let company = requirements(&[("x", 3)]);
    let candidate = profile(&[("x", 1)]);

    let result = compute_affinity(&company, &candidate);
    let json = serde_json::to_value(&result).expect("result serializes");

    assert_eq!(json["level"], "low");
    assert_eq!(json["is_special_case_3_to_1"], true);
    assert_eq!(
        json["matches"][0]["proportional_factor_applied"]["kind"],
        "not_applicable"
    );
}

#[test]
fn text_report_matches_result() {
    let company = requirements(&[("rust", 3), ("sql", 2)]);
    let candidate = profile(&[("rust", 2), ("sql", 2)]);

    let result = compute_affinity(&company, &candidate);
    let text = render_text(&result);

    assert!(text.starts_with(&format!("Affinity: {}", result.level.label())));
    assert!(text.contains("  - rust: 2.0 (3-2)"));
    assert!(text.contains("  - sql: 1.6 (2-2, value-two match)"));
}
