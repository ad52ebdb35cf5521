//! Core data model types for classpulse.
//!
//! These are the fundamental types the entire system uses to represent
//! students, feedback submissions, and the roll identifier format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RollFormatError;

/// Number of questions on the feedback form. Every submission carries
/// exactly this many ratings.
pub const QUESTION_COUNT: usize = 15;

/// The institutional roll number format: a fixed prefix followed by a
/// fixed number of digits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollPattern {
    /// Literal prefix every roll starts with.
    pub prefix: String,
    /// Number of digits after the prefix.
    pub suffix_digits: usize,
}

impl Default for RollPattern {
    fn default() -> Self {
        Self {
            prefix: "718123".to_string(),
            suffix_digits: 5,
        }
    }
}

impl RollPattern {
    /// Check an already-normalized roll string against this pattern.
    pub fn matches(&self, s: &str) -> bool {
        match s.strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                rest.len() == self.suffix_digits && rest.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        }
    }

    /// Human-readable description of the expected format, used in errors.
    pub fn describe(&self) -> String {
        format!("{}{}", self.prefix, "d".repeat(self.suffix_digits))
    }
}

/// A normalized student roll identifier.
///
/// Construction goes through [`Roll::normalize`] (trim, strip a trailing
/// spreadsheet decimal) or [`Roll::parse`] (normalize plus format check),
/// so a `Roll` held by a store is always in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roll(String);

impl Roll {
    /// Normalize a raw roll value without validating its format.
    ///
    /// Trims surrounding whitespace and truncates at the first `.`, so a
    /// spreadsheet numeric coercion like `"71812301231.0"` recovers the
    /// canonical `"71812301231"`.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        let canonical = match trimmed.split_once('.') {
            Some((head, _)) => head,
            None => trimmed,
        };
        Roll(canonical.to_string())
    }

    /// Normalize and validate a raw roll value against the pattern.
    pub fn parse(raw: &str, pattern: &RollPattern) -> Result<Self, RollFormatError> {
        let roll = Self::normalize(raw);
        if pattern.matches(roll.as_str()) {
            Ok(roll)
        } else {
            Err(RollFormatError {
                value: roll.0,
                expected: pattern.describe(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered student, created only through roster ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Display name from the roster.
    pub name: String,
    /// Department from the roster; `"Unknown"` when the source omits it.
    pub department: String,
    /// Whether this student has submitted feedback during the current
    /// event. Starts false, set true exactly once on successful
    /// submission, preserved across roster re-ingestion.
    pub attempted: bool,
}

impl Student {
    pub fn new(name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            attempted: false,
        }
    }
}

/// The fixed-length rating vector of one submission.
///
/// Values are accepted as-is; only the count is validated. Adding a range
/// check would change acceptance semantics for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ratings(pub [i32; QUESTION_COUNT]);

impl Ratings {
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}

impl TryFrom<Vec<i32>> for Ratings {
    type Error = WrongRatingCount;

    fn try_from(values: Vec<i32>) -> Result<Self, Self::Error> {
        let got = values.len();
        match <[i32; QUESTION_COUNT]>::try_from(values) {
            Ok(arr) => Ok(Ratings(arr)),
            Err(_) => Err(WrongRatingCount {
                expected: QUESTION_COUNT,
                got,
            }),
        }
    }
}

/// Length mismatch when converting a rating vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongRatingCount {
    pub expected: usize,
    pub got: usize,
}

/// One submitted feedback record, keyed externally by `(roll, course_code)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// The 15 question ratings.
    pub ratings: Ratings,
    /// Staff the ratings apply to. The submission flow stores exactly one
    /// entry, but the model (and the aggregation fold) supports several.
    pub staff: Vec<String>,
}

/// Registration and submission status for one roll, as reported to the
/// student-facing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStatus {
    pub registered: bool,
    pub attempted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_spreadsheet_decimal() {
        assert_eq!(Roll::normalize("71812301231.0").as_str(), "71812301231");
        assert_eq!(Roll::normalize("  71812301231 ").as_str(), "71812301231");
        assert_eq!(Roll::normalize("71812301231").as_str(), "71812301231");
    }

    #[test]
    fn pattern_matches_canonical_rolls() {
        let pattern = RollPattern::default();
        assert!(pattern.matches("71812301231"));
        assert!(!pattern.matches("71812301"));
        assert!(!pattern.matches("718123012345"));
        assert!(!pattern.matches("7181230123a"));
        assert!(!pattern.matches("99912301231"));
    }

    #[test]
    fn parse_rejects_bad_format() {
        let pattern = RollPattern::default();
        assert!(Roll::parse("71812301231.0", &pattern).is_ok());
        let err = Roll::parse("nonsense", &pattern).unwrap_err();
        assert_eq!(err.value, "nonsense");
    }

    #[test]
    fn ratings_try_from_enforces_length() {
        assert!(Ratings::try_from(vec![3; QUESTION_COUNT]).is_ok());
        let err = Ratings::try_from(vec![3; 14]).unwrap_err();
        assert_eq!(err.expected, 15);
        assert_eq!(err.got, 14);
    }

    #[test]
    fn student_starts_not_attempted() {
        let s = Student::new("Asha", "CSE");
        assert!(!s.attempted);
    }
}
