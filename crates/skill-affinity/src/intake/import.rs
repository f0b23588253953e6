use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::budget::normalize_attribute_name;
use super::Candidate;
use crate::affinity::{AttributeWeight, RatedAttributeSet};

/// Failure while reading a `candidate,attribute,weight` export.
#[derive(Debug, thiserror::Error)]
pub enum CandidateImportError {
    #[error("failed to read candidate export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: candidate and attribute must not be blank")]
    MissingField { row: usize },
    #[error("row {row}: weight '{value}' for '{attribute}' must be 1, 2 or 3")]
    InvalidWeight {
        row: usize,
        attribute: String,
        value: String,
    },
    #[error("row {row}: candidate '{candidate}' lists '{attribute}' more than once")]
    DuplicateAttribute {
        row: usize,
        candidate: String,
        attribute: String,
    },
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    candidate: String,
    attribute: String,
    weight: String,
}

pub fn import_candidates_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Candidate>, CandidateImportError> {
    let file = std::fs::File::open(path)?;
    import_candidates(file)
}

/// Group rows by candidate in first-seen order; attribute order follows the
/// rows. Row numbers in errors are 1-based and exclude the header.
pub fn import_candidates<R: Read>(reader: R) -> Result<Vec<Candidate>, CandidateImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
        let row = index + 1;
        let CandidateRow {
            candidate,
            attribute,
            weight,
        } = record?;

        let attribute = normalize_attribute_name(&attribute);
        if candidate.is_empty() || attribute.is_empty() {
            return Err(CandidateImportError::MissingField { row });
        }

        let parsed = weight
            .parse::<i64>()
            .ok()
            .and_then(|value| AttributeWeight::try_from(value).ok())
            .ok_or_else(|| CandidateImportError::InvalidWeight {
                row,
                attribute: attribute.clone(),
                value: weight.clone(),
            })?;

        let position = *positions.entry(candidate.clone()).or_insert_with(|| {
            candidates.push(Candidate {
                id: candidate.clone(),
                attributes: RatedAttributeSet::new(),
            });
            candidates.len() - 1
        });

        let entry = &mut candidates[position];
        if entry.attributes.contains(&attribute) {
            return Err(CandidateImportError::DuplicateAttribute {
                row,
                candidate,
                attribute,
            });
        }
        entry.attributes.insert(attribute, parsed);
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn import(data: &str) -> Result<Vec<Candidate>, CandidateImportError> {
        import_candidates(Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn groups_rows_by_candidate_in_first_seen_order() {
        let candidates = import(
            "candidate,attribute,weight\n\
             lucia, Rust ,3\n\
             marco,sql,2\n\
             lucia,Docker,1\n",
        )
        .expect("valid export");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "lucia");
        assert_eq!(
            candidates[0].attributes.names().collect::<Vec<_>>(),
            vec!["rust", "docker"]
        );
        assert_eq!(
            candidates[1].attributes.get("sql"),
            Some(AttributeWeight::Medium)
        );
    }

    #[test]
    fn reports_row_of_invalid_weight() {
        let err = import("candidate,attribute,weight\nlucia,rust,3\nlucia,sql,9\n")
            .expect_err("weight 9 is invalid");

        match err {
            CandidateImportError::InvalidWeight { row, attribute, value } => {
                assert_eq!(row, 2);
                assert_eq!(attribute, "sql");
                assert_eq!(value, "9");
            }
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_attribute_for_same_candidate() {
        let err = import("candidate,attribute,weight\nlucia,rust,3\nlucia,RUST,1\n")
            .expect_err("duplicate attribute");

        assert!(matches!(
            err,
            CandidateImportError::DuplicateAttribute { row: 2, .. }
        ));
    }

    #[test]
    fn rejects_blank_fields() {
        let err = import("candidate,attribute,weight\n,rust,3\n").expect_err("blank candidate");
        assert!(matches!(err, CandidateImportError::MissingField { row: 1 }));
    }
}
