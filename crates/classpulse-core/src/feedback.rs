//! The feedback record store.

use std::collections::HashMap;

use crate::model::{FeedbackRecord, Roll};

/// Submitted feedback keyed by `(roll, course_code)`.
///
/// At most one record per pair exists by construction: the engine only
/// inserts while the student's `attempted` flag is false, and flips the
/// flag in the same critical section.
#[derive(Debug, Default)]
pub struct FeedbackStore {
    records: HashMap<(Roll, String), FeedbackRecord>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, roll: Roll, course_code: String, record: FeedbackRecord) {
        self.records.insert((roll, course_code), record);
    }

    pub fn get(&self, roll: &Roll, course_code: &str) -> Option<&FeedbackRecord> {
        self.records
            .get(&(roll.clone(), course_code.to_string()))
    }

    /// All records, iteration order irrelevant. Consumed by the
    /// aggregation fold and the export adapter.
    pub fn records(&self) -> impl Iterator<Item = (&(Roll, String), &FeedbackRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose key starts with the given roll. Used by
    /// tests to assert the exactly-once invariant.
    pub fn records_for_roll(&self, roll: &Roll) -> usize {
        self.records.keys().filter(|(r, _)| r == roll).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ratings;

    fn record(value: i32) -> FeedbackRecord {
        FeedbackRecord {
            ratings: Ratings([value; 15]),
            staff: vec!["Staff A".into()],
        }
    }

    #[test]
    fn insert_and_get() {
        let mut store = FeedbackStore::new();
        let roll = Roll::normalize("71812301231");
        store.insert(roll.clone(), "CSE101".into(), record(3));

        let fetched = store.get(&roll, "CSE101").unwrap();
        assert_eq!(fetched.ratings.as_slice(), &[3; 15]);
        assert!(store.get(&roll, "MTH102").is_none());
    }

    #[test]
    fn records_for_roll_counts_by_first_key_component() {
        let mut store = FeedbackStore::new();
        let a = Roll::normalize("71812301231");
        let b = Roll::normalize("71812301232");
        store.insert(a.clone(), "CSE101".into(), record(3));
        store.insert(b.clone(), "CSE101".into(), record(4));

        assert_eq!(store.records_for_roll(&a), 1);
        assert_eq!(store.records_for_roll(&b), 1);
        assert_eq!(store.len(), 2);
    }
}
