use super::domain::{AttributeWeight, FactorApplication, MatchEntry};
use super::matching::{RawMatch, SpecialCases};

/// Upper bound for a single-match value and for the single-match total.
pub(crate) const SINGLE_MATCH_CAP: f64 = 3.0;
const THREE_TO_ONE_VALUE: f64 = 1.0;
const SINGLE_MATCH_SUPERIOR_VALUE: f64 = 2.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PairFlags {
    premium: bool,
    value_two: bool,
    superior: bool,
}

impl PairFlags {
    const NONE: PairFlags = PairFlags {
        premium: false,
        value_two: false,
        superior: false,
    };
    const PREMIUM: PairFlags = PairFlags {
        premium: true,
        ..PairFlags::NONE
    };
    const VALUE_TWO: PairFlags = PairFlags {
        value_two: true,
        ..PairFlags::NONE
    };
    const SUPERIOR: PairFlags = PairFlags {
        superior: true,
        ..PairFlags::NONE
    };

    fn for_pair(subject1: AttributeWeight, subject2: AttributeWeight) -> Self {
        match (subject1, subject2) {
            (AttributeWeight::High, AttributeWeight::High) => Self::PREMIUM,
            (AttributeWeight::Medium, AttributeWeight::Medium) => Self::VALUE_TWO,
            (lhs, rhs) if rhs > lhs => Self::SUPERIOR,
            _ => Self::NONE,
        }
    }
}

/// Resolve one match under exactly one rule set: 3-vs-1 first, then the
/// single-match table, then the normal table.
pub(crate) fn resolve_match(
    raw: &RawMatch<'_>,
    cases: SpecialCases,
    proportional_factor: f64,
) -> MatchEntry {
    if cases.three_to_one && raw.pair() == (AttributeWeight::High, AttributeWeight::Low) {
        return resolve_three_to_one(raw, cases);
    }
    if cases.single_match {
        return resolve_single_match(raw, proportional_factor);
    }
    resolve_normal(raw, proportional_factor)
}

fn resolve_three_to_one(raw: &RawMatch<'_>, cases: SpecialCases) -> MatchEntry {
    entry(
        raw,
        THREE_TO_ONE_VALUE,
        THREE_TO_ONE_VALUE,
        PairFlags::NONE,
        FactorApplication::NotApplicable,
    )
    .special(cases.single_match)
}

fn resolve_single_match(raw: &RawMatch<'_>, proportional_factor: f64) -> MatchEntry {
    let (base_value, flags) = match raw.pair() {
        (AttributeWeight::Low, AttributeWeight::High) => {
            (SINGLE_MATCH_SUPERIOR_VALUE, PairFlags::SUPERIOR)
        }
        (subject1, subject2) => {
            let formula = 1.0 + 0.5 * subject1.as_f64() + 0.3 * subject2.as_f64();
            (
                formula.min(SINGLE_MATCH_CAP),
                PairFlags::for_pair(subject1, subject2),
            )
        }
    };

    let final_value = (base_value * proportional_factor).min(SINGLE_MATCH_CAP);
    let application = FactorApplication::Capped {
        factor: proportional_factor,
        cap: SINGLE_MATCH_CAP,
    };

    let mut resolved = entry(raw, base_value, final_value, flags, application);
    resolved.is_single_match_case = true;
    resolved
}

fn resolve_normal(raw: &RawMatch<'_>, proportional_factor: f64) -> MatchEntry {
    let base_value = normal_base_value(raw.subject1_weight, raw.subject2_weight);
    let flags = PairFlags::for_pair(raw.subject1_weight, raw.subject2_weight);
    entry(
        raw,
        base_value,
        base_value * proportional_factor,
        flags,
        FactorApplication::Applied {
            factor: proportional_factor,
        },
    )
}

/// Pairwise table for matches outside the single-match and 3-vs-1 cases.
pub(crate) fn normal_base_value(subject1: AttributeWeight, subject2: AttributeWeight) -> f64 {
    use AttributeWeight::{High, Low, Medium};

    match (subject1, subject2) {
        (High, High) => 3.0,
        (High, Medium) => 2.0,
        (High, Low) => 1.2,
        (Medium, High) => 1.8,
        (Medium, Medium) => 1.6,
        (Medium, Low) => 1.0,
        (Low, High) => 1.2,
        (Low, Medium) => 1.1,
        (Low, Low) => 0.8,
    }
}

fn entry(
    raw: &RawMatch<'_>,
    base_value: f64,
    final_value: f64,
    flags: PairFlags,
    application: FactorApplication,
) -> MatchEntry {
    MatchEntry {
        name: raw.name.to_string(),
        subject1_weight: raw.subject1_weight,
        subject2_weight: raw.subject2_weight,
        base_value,
        final_value,
        is_premium_match: flags.premium,
        is_value_two_match: flags.value_two,
        is_superior_rating: flags.superior,
        is_special_case: false,
        is_single_match_case: false,
        proportional_factor_applied: application,
    }
}

impl MatchEntry {
    fn special(mut self, single_match: bool) -> Self {
        self.is_special_case = true;
        self.is_single_match_case = single_match;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttributeWeight::{High, Low, Medium};

    const PF: f64 = 1.0 + 7.0 / 30.0;

    fn raw(subject1_weight: AttributeWeight, subject2_weight: AttributeWeight) -> RawMatch<'static> {
        RawMatch {
            name: "rust",
            subject1_weight,
            subject2_weight,
        }
    }

    fn single() -> SpecialCases {
        SpecialCases {
            single_match: true,
            three_to_one: false,
        }
    }

    #[test]
    fn normal_table_scales_by_proportional_factor_without_cap() {
        let resolved = resolve_match(&raw(High, High), SpecialCases::default(), PF);

        assert_eq!(resolved.base_value, 3.0);
        assert!((resolved.final_value - 3.0 * PF).abs() < 1e-9);
        assert!(resolved.final_value > SINGLE_MATCH_CAP);
        assert!(resolved.is_premium_match);
        assert_eq!(
            resolved.proportional_factor_applied,
            FactorApplication::Applied { factor: PF }
        );
    }

    #[test]
    fn normal_table_flags_follow_pairs() {
        let cases = SpecialCases::default();
        let two_two = resolve_match(&raw(Medium, Medium), cases, 1.0);
        assert!(two_two.is_value_two_match && !two_two.is_superior_rating);
        assert_eq!(two_two.base_value, 1.6);

        for (pair, value) in [((Medium, High), 1.8), ((Low, High), 1.2), ((Low, Medium), 1.1)] {
            let resolved = resolve_match(&raw(pair.0, pair.1), cases, 1.0);
            assert!(resolved.is_superior_rating, "{pair:?} should be superior");
            assert_eq!(resolved.base_value, value);
        }

        for (pair, value) in [((High, Medium), 2.0), ((High, Low), 1.2), ((Medium, Low), 1.0), ((Low, Low), 0.8)] {
            let resolved = resolve_match(&raw(pair.0, pair.1), cases, 1.0);
            assert!(!resolved.is_superior_rating && !resolved.is_premium_match);
            assert_eq!(resolved.base_value, value);
        }
    }

    #[test]
    fn three_to_one_skips_factor() {
        let cases = SpecialCases {
            single_match: false,
            three_to_one: true,
        };
        let resolved = resolve_match(&raw(High, Low), cases, PF);

        assert_eq!(resolved.base_value, 1.0);
        assert_eq!(resolved.final_value, 1.0);
        assert!(resolved.is_special_case);
        assert!(!resolved.is_single_match_case);
        assert_eq!(
            resolved.proportional_factor_applied,
            FactorApplication::NotApplicable
        );
    }

    #[test]
    fn three_to_one_takes_precedence_over_single_match() {
        let cases = SpecialCases {
            single_match: true,
            three_to_one: true,
        };
        let resolved = resolve_match(&raw(High, Low), cases, PF);

        assert_eq!(resolved.final_value, 1.0);
        assert!(resolved.is_special_case && resolved.is_single_match_case);
    }

    #[test]
    fn single_match_one_to_three_override_is_capped() {
        let resolved = resolve_match(&raw(Low, High), single(), PF);

        assert_eq!(resolved.base_value, 2.5);
        assert_eq!(resolved.final_value, 3.0);
        assert!(resolved.is_superior_rating);
        assert_eq!(
            resolved.proportional_factor_applied,
            FactorApplication::Capped {
                factor: PF,
                cap: 3.0
            }
        );
    }

    #[test]
    fn single_match_formula_is_bounded() {
        let premium = resolve_match(&raw(High, High), single(), 1.0);
        assert_eq!(premium.base_value, 3.0);
        assert!(premium.is_premium_match);

        let modest = resolve_match(&raw(Low, Low), single(), 1.0);
        assert!((modest.base_value - 1.8).abs() < 1e-9);
        assert!((modest.final_value - 1.8).abs() < 1e-9);
        assert_eq!(
            modest.proportional_factor_applied,
            FactorApplication::Capped {
                factor: 1.0,
                cap: 3.0
            }
        );

        let superior = resolve_match(&raw(Medium, High), single(), 1.0);
        assert!((superior.base_value - 2.9).abs() < 1e-9);
        assert!(superior.is_superior_rating);
        assert!(superior.is_single_match_case);
    }
}
