/// Second-subject size at which the proportional boost disappears.
pub(crate) const PROPORTIONAL_TARGET_SIZE: usize = 8;
const PROPORTIONAL_DIVISOR: f64 = 30.0;

/// Coverage at or above which no coverage penalty is applied.
pub(crate) const FULL_COVERAGE_THRESHOLD: f64 = 0.8;
const COVERAGE_FLOOR: f64 = 0.3;
const COVERAGE_SLOPE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Factors {
    pub proportional: f64,
    pub coverage: f64,
    pub coverage_factor: f64,
}

pub(crate) fn compute_factors(match_count: usize, subject1_size: usize, subject2_size: usize) -> Factors {
    let coverage = coverage(match_count, subject1_size);
    Factors {
        proportional: proportional_factor(subject2_size),
        coverage,
        coverage_factor: coverage_factor(coverage),
    }
}

/// Boost for sparse second subjects: `1 + (8 - n) / 30` below eight attributes.
pub(crate) fn proportional_factor(subject2_size: usize) -> f64 {
    if subject2_size < PROPORTIONAL_TARGET_SIZE {
        1.0 + (PROPORTIONAL_TARGET_SIZE - subject2_size) as f64 / PROPORTIONAL_DIVISOR
    } else {
        1.0
    }
}

/// Fraction of the first subject that was matched; zero for an empty subject.
pub(crate) fn coverage(match_count: usize, subject1_size: usize) -> f64 {
    if subject1_size == 0 {
        0.0
    } else {
        match_count as f64 / subject1_size as f64
    }
}

pub(crate) fn coverage_factor(coverage: f64) -> f64 {
    if coverage < FULL_COVERAGE_THRESHOLD {
        COVERAGE_FLOOR + COVERAGE_SLOPE * coverage
    } else {
        1.0
    }
}
