//! The feedback collection engine.
//!
//! `FeedbackEngine` is the explicit store object the request handlers
//! share: constructed at service start, passed by handle, never ambient.
//! It owns the roster and feedback stores behind a single `RwLock`, so
//! the "check `attempted`, then set it, then insert the record" sequence
//! in `submit` is one critical section and a double-submit race is
//! impossible. Reads (status, aggregation, export) share the read lock
//! and may run concurrently with each other.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::aggregate::{self, DashboardSnapshot};
use crate::error::{RollFormatError, RowErrorKind, SubmitError};
use crate::event::EventState;
use crate::feedback::FeedbackStore;
use crate::ingest::{IngestReport, RosterRow};
use crate::model::{FeedbackRecord, Ratings, Roll, RollPattern, StudentStatus};
use crate::roster::RosterStore;

/// One inbound submission from the student-facing boundary.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Raw roll value; normalized here.
    pub roll: String,
    pub course_code: String,
    pub ratings: Vec<i32>,
    pub staff: String,
}

/// One raw record for the flat export listing (roll, course, ratings —
/// not the aggregate).
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub roll: Roll,
    pub course_code: String,
    pub ratings: Ratings,
}

#[derive(Debug, Default)]
struct Stores {
    roster: RosterStore,
    feedback: FeedbackStore,
}

/// The engine. All state is process-lifetime only; a restart loses the
/// roster, the feedback, and the event flag.
#[derive(Debug)]
pub struct FeedbackEngine {
    pattern: RollPattern,
    event: EventState,
    stores: RwLock<Stores>,
}

impl Default for FeedbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackEngine {
    pub fn new() -> Self {
        Self::with_pattern(RollPattern::default())
    }

    pub fn with_pattern(pattern: RollPattern) -> Self {
        Self {
            pattern,
            event: EventState::new(),
            stores: RwLock::new(Stores::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Stores> {
        self.stores.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Stores> {
        self.stores.write().unwrap_or_else(|e| e.into_inner())
    }

    // -----------------------------------------------------------------
    // Event lifecycle
    // -----------------------------------------------------------------

    /// Open or close the event window. May race with in-flight submits;
    /// a submission that read the flag as live just before close stands.
    pub fn set_live(&self, live: bool) {
        tracing::info!(live, "event state changed");
        self.event.set_live(live);
    }

    pub fn is_live(&self) -> bool {
        self.event.is_live()
    }

    // -----------------------------------------------------------------
    // Roster ingestion
    // -----------------------------------------------------------------

    /// Bulk-load roster rows. Each row succeeds or fails on its own;
    /// the report carries accepted/rejected counts and the collected
    /// row errors.
    pub fn ingest_roster(&self, rows: Vec<RosterRow>) -> IngestReport {
        let mut report = IngestReport::default();
        let mut stores = self.write();

        for row in rows {
            if row.roll.trim().is_empty() {
                report.reject(row.line, RowErrorKind::MissingRoll);
                continue;
            }
            if row.name.trim().is_empty() {
                report.reject(row.line, RowErrorKind::MissingName);
                continue;
            }
            match Roll::parse(&row.roll, &self.pattern) {
                Ok(roll) => {
                    stores
                        .roster
                        .upsert(roll, row.name.trim().to_string(), row.department);
                    report.accepted += 1;
                }
                Err(e) => report.reject(row.line, RowErrorKind::BadRollFormat(e)),
            }
        }

        tracing::info!(
            accepted = report.accepted,
            rejected = report.rejected,
            roster_size = stores.roster.len(),
            "roster ingested"
        );
        report
    }

    // -----------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------

    /// Accept one feedback submission.
    ///
    /// Preconditions, checked in order, each a distinct failure: the
    /// event is live, the roll is registered, the student has not
    /// already submitted, the rating vector has exactly 15 entries.
    /// On success the record insert and the `attempted` flip happen
    /// under one write lock.
    ///
    /// `attempted` is per-roll, not per-(roll, course): a student gives
    /// feedback for exactly one course per event. Deliberate scope
    /// restriction, not an oversight.
    pub fn submit(&self, request: SubmitRequest) -> Result<(), SubmitError> {
        if !self.event.is_live() {
            return Err(SubmitError::EventNotLive);
        }

        let roll = Roll::normalize(&request.roll);
        let mut stores = self.write();

        let student = stores
            .roster
            .get(&roll)
            .ok_or_else(|| SubmitError::NotRegistered(roll.clone()))?;
        if student.attempted {
            return Err(SubmitError::AlreadySubmitted(roll));
        }

        let ratings = Ratings::try_from(request.ratings).map_err(|e| {
            SubmitError::WrongRatingCount {
                expected: e.expected,
                got: e.got,
            }
        })?;

        stores.feedback.insert(
            roll.clone(),
            request.course_code.clone(),
            FeedbackRecord {
                ratings,
                staff: vec![request.staff],
            },
        );
        stores.roster.mark_attempted(&roll);

        tracing::debug!(%roll, course = %request.course_code, "feedback recorded");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Registration and submission status for one raw roll value. The
    /// roll is format-checked first, as the student login does.
    pub fn student_status(&self, raw_roll: &str) -> Result<StudentStatus, RollFormatError> {
        let roll = Roll::parse(raw_roll, &self.pattern)?;
        let stores = self.read();
        Ok(match stores.roster.get(&roll) {
            Some(student) => StudentStatus {
                registered: true,
                attempted: student.attempted,
            },
            None => StudentStatus {
                registered: false,
                attempted: false,
            },
        })
    }

    /// Fetch one stored record.
    pub fn feedback(&self, raw_roll: &str, course_code: &str) -> Option<FeedbackRecord> {
        let roll = Roll::normalize(raw_roll);
        self.read().feedback.get(&roll, course_code).cloned()
    }

    pub fn submission_count(&self) -> usize {
        self.read().feedback.len()
    }

    /// Recompute the dashboard snapshot from current store contents.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let stores = self.read();
        aggregate::aggregate(&stores.roster, &stores.feedback)
    }

    /// Raw records for the flat export listing, sorted by key so the
    /// output is stable across runs.
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let stores = self.read();
        let mut rows: Vec<ExportRow> = stores
            .feedback
            .records()
            .map(|((roll, course_code), record)| ExportRow {
                roll: roll.clone(),
                course_code: course_code.clone(),
                ratings: record.ratings,
            })
            .collect();
        rows.sort_by(|a, b| (&a.roll, &a.course_code).cmp(&(&b.roll, &b.course_code)));
        rows
    }
}
