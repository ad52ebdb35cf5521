//! The student roster store.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::{Roll, Student};

/// Department recorded when the roster source omits one.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// Registered students keyed by normalized roll.
///
/// Plain data structure with no interior locking; the engine serializes
/// access through its own lock.
#[derive(Debug, Default)]
pub struct RosterStore {
    students: HashMap<Roll, Student>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a student.
    ///
    /// Re-ingesting a known roll overwrites name and department but
    /// preserves `attempted`, so a roster refresh can never re-enable
    /// submission for a student who already responded.
    pub fn upsert(&mut self, roll: Roll, name: String, department: Option<String>) {
        let department = department.unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string());
        match self.students.entry(roll) {
            Entry::Occupied(mut existing) => {
                let student = existing.get_mut();
                student.name = name;
                student.department = department;
            }
            Entry::Vacant(slot) => {
                slot.insert(Student::new(name, department));
            }
        }
    }

    pub fn get(&self, roll: &Roll) -> Option<&Student> {
        self.students.get(roll)
    }

    /// Mark a student as having submitted. The caller must already have
    /// checked `!attempted` inside the same critical section.
    pub fn mark_attempted(&mut self, roll: &Roll) {
        if let Some(student) = self.students.get_mut(roll) {
            student.attempted = true;
        }
    }

    /// Rolls that have not yet submitted, in no particular order.
    pub fn not_attempted(&self) -> Vec<Roll> {
        self.students
            .iter()
            .filter(|(_, s)| !s.attempted)
            .map(|(roll, _)| roll.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn attempted_count(&self) -> usize {
        self.students.values().filter(|s| s.attempted).count()
    }

    /// Percentage of registered students who have submitted, rounded to
    /// two decimals; `0.0` for an empty roster.
    pub fn attendance_percentage(&self) -> f64 {
        let total = self.len();
        if total == 0 {
            return 0.0;
        }
        crate::aggregate::round2(self.attempted_count() as f64 / total as f64 * 100.0)
    }
}
