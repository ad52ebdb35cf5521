//! On-demand aggregation of raw submissions into dashboard summaries.
//!
//! A pure fold over the current store contents: no side effects, no
//! derived state kept anywhere, recomputed in full on every call. Safe to
//! run concurrently with other reads.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::FeedbackStore;
use crate::model::{Roll, QUESTION_COUNT};
use crate::roster::RosterStore;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregated rating statistics for one `(course, staff)` pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStaffSummary {
    /// Number of records that contributed.
    pub count: usize,
    /// Per-question running sums.
    pub total_ratings: [i64; QUESTION_COUNT],
    /// Per-question averages, rounded to two decimals.
    pub avg_ratings: [f64; QUESTION_COUNT],
}

impl CourseStaffSummary {
    fn empty() -> Self {
        Self {
            count: 0,
            total_ratings: [0; QUESTION_COUNT],
            avg_ratings: [0.0; QUESTION_COUNT],
        }
    }

    fn finalize(&mut self) {
        for i in 0..QUESTION_COUNT {
            // count == 0 cannot happen for a summary that exists, but the
            // division is still guarded.
            self.avg_ratings[i] = if self.count == 0 {
                0.0
            } else {
                round2(self.total_ratings[i] as f64 / self.count as f64)
            };
        }
    }
}

/// Immutable aggregation output consumed by the reporting adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Unique snapshot identifier.
    pub id: Uuid,
    /// When the snapshot was computed.
    pub generated_at: DateTime<Utc>,
    /// `course_code -> staff -> summary`.
    pub summary: HashMap<String, HashMap<String, CourseStaffSummary>>,
    /// Rolls that have not submitted, in no particular order.
    pub not_attempted: Vec<Roll>,
    /// Submitted / registered, as a percentage rounded to two decimals.
    pub attendance_percentage: f64,
}

impl DashboardSnapshot {
    /// Save the snapshot as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
        let snapshot: DashboardSnapshot =
            serde_json::from_str(&content).context("failed to parse snapshot JSON")?;
        Ok(snapshot)
    }

    /// Look up one summary cell, mostly for tests and the console view.
    pub fn summary_for(&self, course_code: &str, staff: &str) -> Option<&CourseStaffSummary> {
        self.summary.get(course_code)?.get(staff)
    }
}

/// Fold the current store contents into a fresh snapshot.
pub fn aggregate(roster: &RosterStore, feedback: &FeedbackStore) -> DashboardSnapshot {
    let mut summary: HashMap<String, HashMap<String, CourseStaffSummary>> = HashMap::new();

    for ((_, course_code), record) in feedback.records() {
        let per_course = summary.entry(course_code.clone()).or_default();
        for staff in &record.staff {
            let cell = per_course
                .entry(staff.clone())
                .or_insert_with(CourseStaffSummary::empty);
            cell.count += 1;
            for (total, rating) in cell.total_ratings.iter_mut().zip(record.ratings.as_slice()) {
                *total += i64::from(*rating);
            }
        }
    }

    for per_course in summary.values_mut() {
        for cell in per_course.values_mut() {
            cell.finalize();
        }
    }

    DashboardSnapshot {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        summary,
        not_attempted: roster.not_attempted(),
        attendance_percentage: roster.attendance_percentage(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeedbackRecord, Ratings};

    fn roll(s: &str) -> Roll {
        Roll::normalize(s)
    }

    fn record(ratings: [i32; QUESTION_COUNT], staff: &[&str]) -> FeedbackRecord {
        FeedbackRecord {
            ratings: Ratings(ratings),
            staff: staff.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn single_record_scenario() {
        let mut roster = RosterStore::new();
        roster.upsert(roll("71812301231"), "A".into(), None);
        roster.upsert(roll("71812301232"), "B".into(), None);
        roster.mark_attempted(&roll("71812301231"));

        let mut feedback = FeedbackStore::new();
        feedback.insert(
            roll("71812301231"),
            "CSE101".into(),
            record([3; QUESTION_COUNT], &["Staff A"]),
        );

        let snapshot = aggregate(&roster, &feedback);
        let cell = snapshot.summary_for("CSE101", "Staff A").unwrap();
        assert_eq!(cell.count, 1);
        assert_eq!(cell.avg_ratings, [3.0; QUESTION_COUNT]);
        assert_eq!(snapshot.not_attempted, vec![roll("71812301232")]);
        assert_eq!(snapshot.attendance_percentage, 50.0);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let mut roster = RosterStore::new();
        let mut feedback = FeedbackStore::new();
        for (i, value) in [5, 4, 4].into_iter().enumerate() {
            let r = roll(&format!("7181230123{i}"));
            roster.upsert(r.clone(), format!("S{i}"), None);
            roster.mark_attempted(&r);
            feedback.insert(r, "CSE101".into(), record([value; QUESTION_COUNT], &["Staff A"]));
        }

        let snapshot = aggregate(&roster, &feedback);
        let cell = snapshot.summary_for("CSE101", "Staff A").unwrap();
        assert_eq!(cell.count, 3);
        // 13/3 = 4.333... rounds to 4.33
        assert_eq!(cell.avg_ratings[0], 4.33);
        assert_eq!(cell.total_ratings[0], 13);
    }

    #[test]
    fn fold_is_order_independent() {
        let records: Vec<(Roll, String, FeedbackRecord)> = (0..6)
            .map(|i| {
                (
                    roll(&format!("7181230123{i}")),
                    format!("CSE10{}", i % 2),
                    record([i; QUESTION_COUNT], &["Staff A", "Staff B"]),
                )
            })
            .collect();

        let build = |order: &[usize]| {
            let roster = RosterStore::new();
            let mut feedback = FeedbackStore::new();
            for &i in order {
                let (r, course, rec) = records[i].clone();
                feedback.insert(r, course, rec);
            }
            aggregate(&roster, &feedback).summary
        };

        let forward = build(&[0, 1, 2, 3, 4, 5]);
        let reversed = build(&[5, 4, 3, 2, 1, 0]);
        let shuffled = build(&[3, 0, 5, 1, 4, 2]);
        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn multi_staff_record_counts_into_each_cell() {
        let roster = RosterStore::new();
        let mut feedback = FeedbackStore::new();
        feedback.insert(
            roll("71812301231"),
            "CSE101".into(),
            record([4; QUESTION_COUNT], &["Staff A", "Staff B"]),
        );

        let snapshot = aggregate(&roster, &feedback);
        assert_eq!(snapshot.summary_for("CSE101", "Staff A").unwrap().count, 1);
        assert_eq!(snapshot.summary_for("CSE101", "Staff B").unwrap().count, 1);
    }

    #[test]
    fn empty_stores_aggregate_cleanly() {
        let snapshot = aggregate(&RosterStore::new(), &FeedbackStore::new());
        assert!(snapshot.summary.is_empty());
        assert!(snapshot.not_attempted.is_empty());
        assert_eq!(snapshot.attendance_percentage, 0.0);
    }

    #[test]
    fn zero_count_summary_averages_to_zero() {
        let mut cell = CourseStaffSummary::empty();
        cell.finalize();
        assert_eq!(cell.avg_ratings, [0.0; QUESTION_COUNT]);
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut roster = RosterStore::new();
        roster.upsert(roll("71812301231"), "A".into(), None);
        let mut feedback = FeedbackStore::new();
        feedback.insert(
            roll("71812301231"),
            "CSE101".into(),
            record([2; QUESTION_COUNT], &["Staff A"]),
        );

        let snapshot = aggregate(&roster, &feedback);
        snapshot.save_json(&path).unwrap();
        let loaded = DashboardSnapshot::load_json(&path).unwrap();
        assert_eq!(loaded.id, snapshot.id);
        assert_eq!(loaded.summary, snapshot.summary);
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(50.0), 50.0);
    }
}
