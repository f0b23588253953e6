use crate::affinity::{AffinityEngine, AffinityResult, AttributeWeight, RatedAttributeSet};

pub(super) fn weight(value: u8) -> AttributeWeight {
    AttributeWeight::try_from(value).expect("fixture weights are 1-3")
}

pub(super) fn subject(entries: &[(&str, u8)]) -> RatedAttributeSet {
    entries
        .iter()
        .map(|(name, value)| (*name, weight(*value)))
        .collect()
}

/// Second subject padded with unrelated attributes up to `size`, which keeps
/// the proportional factor at a known value.
pub(super) fn padded_subject(entries: &[(&str, u8)], size: usize) -> RatedAttributeSet {
    let mut set = subject(entries);
    let mut filler = 0;
    while set.len() < size {
        set.insert(format!("unrelated-{filler}"), AttributeWeight::Low);
        filler += 1;
    }
    set
}

pub(super) fn score(subject1: &RatedAttributeSet, subject2: &RatedAttributeSet) -> AffinityResult {
    AffinityEngine::new().compute(subject1, subject2)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
