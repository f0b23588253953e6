use metrics_exporter_prometheus::PrometheusHandle;
use skill_affinity::affinity::RatedAttributeSet;
use skill_affinity::error::{AppError, SubjectRole};
use skill_affinity::intake::{SubjectBudget, SubjectBuilder};
use skill_affinity::AffinityLevel;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_level(raw: &str) -> Result<AffinityLevel, String> {
    raw.parse::<AffinityLevel>().map_err(|err| err.to_string())
}

/// Build a subject from repeated `name=weight` flags.
pub(crate) fn subject_from_entries(
    entries: &[String],
    role: SubjectRole,
) -> Result<RatedAttributeSet, AppError> {
    // Budgets are enforced once, by `AffinityService`.
    let mut builder = SubjectBuilder::new(SubjectBudget::unbounded());
    for entry in entries {
        builder
            .add_entry(entry)
            .map_err(|violation| AppError::budget(role, violation))?;
    }
    Ok(builder.build())
}

/// Read a subject stored as a JSON object of `name: weight` pairs. Names are
/// normalized by `AffinityService` along with every other decoded set.
pub(crate) fn subject_from_file(path: &Path) -> Result<RatedAttributeSet, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn load_subject(
    entries: &[String],
    file: Option<&Path>,
    role: SubjectRole,
) -> Result<RatedAttributeSet, AppError> {
    match file {
        Some(path) => subject_from_file(path),
        None => subject_from_entries(entries, role),
    }
}
