use super::domain::{AttributeWeight, RatedAttributeSet};

/// Minimum first-subject size for a lone match to count as a single-match case.
pub(crate) const SINGLE_MATCH_MIN_SUBJECT1: usize = 3;

/// Attribute present in both subjects, before any value is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawMatch<'a> {
    pub name: &'a str,
    pub subject1_weight: AttributeWeight,
    pub subject2_weight: AttributeWeight,
}

impl RawMatch<'_> {
    pub(crate) fn pair(&self) -> (AttributeWeight, AttributeWeight) {
        (self.subject1_weight, self.subject2_weight)
    }
}

pub(crate) fn collect_matches<'a>(
    subject1: &'a RatedAttributeSet,
    subject2: &RatedAttributeSet,
) -> Vec<RawMatch<'a>> {
    subject1
        .iter()
        .filter_map(|(name, subject1_weight)| {
            subject2.get(name).map(|subject2_weight| RawMatch {
                name,
                subject1_weight,
                subject2_weight,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SpecialCases {
    pub single_match: bool,
    pub three_to_one: bool,
}

impl SpecialCases {
    pub(crate) fn is_normal(self) -> bool {
        !self.single_match && !self.three_to_one
    }
}

/// The 3-vs-1 check deliberately ignores the first subject's size, so a lone
/// 3-1 match in a one or two attribute set is still forced low without being
/// flagged as a single-match case.
pub(crate) fn detect_special_cases(matches: &[RawMatch<'_>], subject1_size: usize) -> SpecialCases {
    let [only] = matches else {
        return SpecialCases::default();
    };

    SpecialCases {
        single_match: subject1_size >= SINGLE_MATCH_MIN_SUBJECT1,
        three_to_one: only.pair() == (AttributeWeight::High, AttributeWeight::Low),
    }
}
