//! Core error taxonomy.
//!
//! Every error here is a per-request rejection returned to the caller;
//! none of them corrupts a store and none is fatal to the process.

use thiserror::Error;

use crate::model::Roll;

/// Rejections from [`crate::engine::FeedbackEngine::submit`], in the order
/// the preconditions are checked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No feedback event is currently live.
    #[error("no feedback event is live")]
    EventNotLive,

    /// The roll is not present in the roster.
    #[error("roll {0} is not registered")]
    NotRegistered(Roll),

    /// The student already submitted feedback during this event.
    #[error("roll {0} has already submitted feedback")]
    AlreadySubmitted(Roll),

    /// The rating vector did not have exactly the expected length.
    #[error("expected {expected} ratings, got {got}")]
    WrongRatingCount { expected: usize, got: usize },
}

impl SubmitError {
    /// True when the rejection is attributable to the submitting student
    /// (as opposed to the event window being closed).
    pub fn is_student_fault(&self) -> bool {
        !matches!(self, SubmitError::EventNotLive)
    }
}

/// A roll value that does not match the institutional format after
/// normalization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed roll {value:?}, expected format {expected}")]
pub struct RollFormatError {
    pub value: String,
    pub expected: String,
}

/// Why a single ingestion row was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowErrorKind {
    #[error("missing roll value")]
    MissingRoll,

    #[error("missing name value")]
    MissingName,

    #[error("{0}")]
    BadRollFormat(#[from] RollFormatError),

    #[error("{field}: {message}")]
    BadField { field: String, message: String },
}

/// A rejected row from a bulk load, tagged with its 1-based source line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("row {line}: {kind}")]
pub struct RowError {
    pub line: usize,
    pub kind: RowErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_error_messages() {
        assert_eq!(SubmitError::EventNotLive.to_string(), "no feedback event is live");
        let err = SubmitError::WrongRatingCount {
            expected: 15,
            got: 12,
        };
        assert_eq!(err.to_string(), "expected 15 ratings, got 12");
    }

    #[test]
    fn event_not_live_is_not_student_fault() {
        assert!(!SubmitError::EventNotLive.is_student_fault());
        assert!(SubmitError::NotRegistered(crate::model::Roll::normalize("1")).is_student_fault());
    }

    #[test]
    fn row_error_carries_line() {
        let err = RowError {
            line: 4,
            kind: RowErrorKind::MissingName,
        };
        assert_eq!(err.to_string(), "row 4: missing name value");
    }
}
