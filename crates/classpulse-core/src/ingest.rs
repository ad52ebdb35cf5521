//! Bulk ingestion of roster and submission rows.
//!
//! Rows come from CSV files at the boundary. Each row is handled
//! independently: a malformed row is collected as a [`RowError`] and never
//! aborts the batch. Missing required columns, by contrast, fail the whole
//! file, since no row can be interpreted without them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::{RowError, RowErrorKind};
use crate::model::QUESTION_COUNT;

/// One roster row as read from the source, before normalization.
#[derive(Debug, Clone)]
pub struct RosterRow {
    /// 1-based line in the source file (header excluded).
    pub line: usize,
    pub roll: String,
    pub name: String,
    pub department: Option<String>,
}

/// One replayed submission row.
#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub line: usize,
    pub roll: String,
    pub course_code: String,
    pub staff: String,
    pub ratings: Vec<i32>,
}

/// Outcome of a bulk roster load: partial success is normal and reported
/// to the caller as counts plus the collected per-row errors.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: usize,
    #[serde(skip)]
    pub errors: Vec<RowError>,
}

impl IngestReport {
    pub fn reject(&mut self, line: usize, kind: RowErrorKind) {
        self.rejected += 1;
        self.errors.push(RowError { line, kind });
    }

    /// Fold unreadable-row errors from the CSV layer into this report.
    pub fn absorb(&mut self, errors: Vec<RowError>) {
        self.rejected += errors.len();
        self.errors.extend(errors);
    }
}

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn require_header(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    header_index(headers, name)
        .with_context(|| format!("{}: missing required column '{name}'", path.display()))
}

/// Read a roster CSV with columns `roll,name[,department]`.
///
/// Returns the parseable rows plus per-line errors for rows the CSV layer
/// could not decode. Roll format and emptiness checks happen later, in
/// the engine's ingestion step.
pub fn read_roster_csv(path: &Path) -> Result<(Vec<RosterRow>, Vec<RowError>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open roster file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let roll_idx = require_header(&headers, "roll", path)?;
    let name_idx = require_header(&headers, "name", path)?;
    let dept_idx = header_index(&headers, "department");

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let line = i + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                errors.push(RowError {
                    line,
                    kind: RowErrorKind::BadField {
                        field: "row".into(),
                        message: e.to_string(),
                    },
                });
                continue;
            }
        };

        rows.push(RosterRow {
            line,
            roll: record.get(roll_idx).unwrap_or_default().to_string(),
            name: record.get(name_idx).unwrap_or_default().to_string(),
            department: dept_idx
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        });
    }

    Ok((rows, errors))
}

/// Read a submissions CSV with columns `roll,course_code,staff,q1..q15`.
pub fn read_submissions_csv(path: &Path) -> Result<(Vec<SubmissionRow>, Vec<RowError>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open submissions file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let roll_idx = require_header(&headers, "roll", path)?;
    let course_idx = require_header(&headers, "course_code", path)?;
    let staff_idx = require_header(&headers, "staff", path)?;
    let rating_idx: Vec<usize> = (1..=QUESTION_COUNT)
        .map(|q| require_header(&headers, &format!("q{q}"), path))
        .collect::<Result<_>>()?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    'rows: for (i, result) in reader.records().enumerate() {
        let line = i + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                errors.push(RowError {
                    line,
                    kind: RowErrorKind::BadField {
                        field: "row".into(),
                        message: e.to_string(),
                    },
                });
                continue;
            }
        };

        let mut ratings = Vec::with_capacity(QUESTION_COUNT);
        for (q, &idx) in rating_idx.iter().enumerate() {
            let raw = record.get(idx).unwrap_or_default().trim();
            match raw.parse::<i32>() {
                Ok(value) => ratings.push(value),
                Err(_) => {
                    errors.push(RowError {
                        line,
                        kind: RowErrorKind::BadField {
                            field: format!("q{}", q + 1),
                            message: format!("not an integer: {raw:?}"),
                        },
                    });
                    continue 'rows;
                }
            }
        }

        rows.push(SubmissionRow {
            line,
            roll: record.get(roll_idx).unwrap_or_default().to_string(),
            course_code: record.get(course_idx).unwrap_or_default().trim().to_string(),
            staff: record.get(staff_idx).unwrap_or_default().trim().to_string(),
            ratings,
        });
    }

    Ok((rows, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn roster_csv_reads_rows_and_optional_department() {
        let file = write_temp(
            "roll,name,department\n71812301231.0,Asha,CSE\n71812301232,Ben,\n",
        );
        let (rows, errors) = read_roster_csv(file.path()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].roll, "71812301231.0");
        assert_eq!(rows[0].department.as_deref(), Some("CSE"));
        assert_eq!(rows[1].department, None);
    }

    #[test]
    fn roster_csv_without_department_column() {
        let file = write_temp("roll,name\n71812301231,Asha\n");
        let (rows, _) = read_roster_csv(file.path()).unwrap();
        assert_eq!(rows[0].department, None);
    }

    #[test]
    fn roster_csv_missing_required_column_fails_whole_file() {
        let file = write_temp("roll,department\n71812301231,CSE\n");
        let err = read_roster_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("missing required column 'name'"));
    }

    #[test]
    fn submissions_csv_parses_ratings() {
        let header: String = std::iter::once("roll,course_code,staff".to_string())
            .chain((1..=QUESTION_COUNT).map(|q| format!("q{q}")))
            .collect::<Vec<_>>()
            .join(",");
        let values = vec!["4"; QUESTION_COUNT].join(",");
        let file = write_temp(&format!(
            "{header}\n71812301231,CSE101,Staff A,{values}\n71812301232,CSE101,Staff A,{bad}\n",
            bad = {
                let mut v = vec!["4"; QUESTION_COUNT];
                v[3] = "four";
                v.join(",")
            }
        ));

        let (rows, errors) = read_submissions_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ratings, vec![4; QUESTION_COUNT]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn ingest_report_absorb_counts_rejected() {
        let mut report = IngestReport::default();
        report.accepted = 2;
        report.absorb(vec![RowError {
            line: 7,
            kind: RowErrorKind::MissingRoll,
        }]);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.errors.len(), 1);
    }
}
