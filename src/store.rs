use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, RosterError};
use crate::models::{Average, Student, StudentId};

/// In-memory roster keyed by student id.
///
/// Backed by a `BTreeMap`, so every listing comes out in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    students: BTreeMap<StudentId, Student>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a new student with no grades. Leaves the roster untouched if `id` is taken.
    pub fn add_record(&mut self, id: StudentId, name: impl Into<String>) -> Result<()> {
        if self.students.contains_key(&id) {
            return Err(RosterError::DuplicateKey(id));
        }
        self.students.insert(id, Student::new(name));
        debug!(id, "student added");
        Ok(())
    }

    pub fn append_grade(&mut self, id: StudentId, grade: i32) -> Result<()> {
        let student = self.students.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        student.grades.push(grade);
        debug!(id, grade, count = student.grades.len(), "grade appended");
        Ok(())
    }

    pub fn rename_record(&mut self, id: StudentId, new_name: impl Into<String>) -> Result<()> {
        let student = self.students.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        student.name = new_name.into();
        debug!(id, "student renamed");
        Ok(())
    }

    /// Drop a student together with all of their grades.
    pub fn remove_record(&mut self, id: StudentId) -> Result<Student> {
        let removed = self.students.remove(&id).ok_or(RosterError::NotFound(id))?;
        debug!(id, "student removed");
        Ok(removed)
    }

    /// Every student in ascending id order. Calling it again restarts the walk.
    pub fn list_records(&self) -> impl Iterator<Item = (StudentId, &Student)> + '_ {
        self.students.iter().map(|(id, s)| (*id, s))
    }

    pub fn average_grade(&self, id: StudentId) -> Result<Average> {
        self.students
            .get(&id)
            .map(Student::average)
            .ok_or(RosterError::NotFound(id))
    }

    /// `list_records` with each student's average alongside.
    pub fn averages(&self) -> impl Iterator<Item = (StudentId, &Student, Average)> + '_ {
        self.list_records().map(|(id, s)| (id, s, s.average()))
    }

    /// Insert without the duplicate check; a repeated id replaces the earlier entry.
    pub(crate) fn insert_or_replace(&mut self, id: StudentId, student: Student) {
        if self.students.insert(id, student).is_some() {
            debug!(id, "later entry replaced an earlier one with the same id");
        }
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.students.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_record(3, "Linus").unwrap();
        store.add_record(1, "Ada").unwrap();
        store.add_record(2, "Grace").unwrap();
        store
    }

    #[test]
    fn add_then_list_shows_student_without_grades() {
        let mut store = RecordStore::new();
        store.add_record(7, "Ada").unwrap();

        let listed: Vec<_> = store.list_records().collect();
        assert_eq!(listed, vec![(7, &Student::new("Ada"))]);
    }

    #[test]
    fn duplicate_id_is_rejected_without_changes() {
        let mut store = roster();
        store.append_grade(1, 95).unwrap();
        let before = store.clone();

        let err = store.add_record(1, "Impostor").unwrap_err();
        assert!(matches!(err, RosterError::DuplicateKey(1)));
        assert_eq!(store, before);
    }

    #[test]
    fn append_grade_to_missing_id_creates_nothing() {
        let mut store = roster();
        let err = store.append_grade(42, 100).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(42)));
        assert!(!store.contains(42));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn grades_keep_entry_order_and_accept_any_value() {
        let mut store = roster();
        for g in [90, -5, 1000, 0] {
            store.append_grade(2, g).unwrap();
        }
        assert_eq!(store.get(2).unwrap().grades, vec![90, -5, 1000, 0]);
    }

    #[test]
    fn rename_replaces_whole_name() {
        let mut store = roster();
        store.rename_record(3, "Torvalds").unwrap();
        assert_eq!(store.get(3).unwrap().name, "Torvalds");

        let err = store.rename_record(9, "Nobody").unwrap_err();
        assert!(matches!(err, RosterError::NotFound(9)));
    }

    #[test]
    fn remove_drops_student_and_grades() {
        let mut store = roster();
        store.append_grade(1, 80).unwrap();

        let removed = store.remove_record(1).unwrap();
        assert_eq!(removed.grades, vec![80]);
        assert!(store.get(1).is_none());
        assert!(matches!(store.remove_record(1), Err(RosterError::NotFound(1))));
    }

    #[test]
    fn listing_is_ascending_and_restartable() {
        let store = roster();
        let first: Vec<_> = store.list_records().map(|(id, _)| id).collect();
        let second: Vec<_> = store.list_records().map(|(id, _)| id).collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn average_scenario() {
        let mut store = RecordStore::new();
        store.add_record(1, "Ada").unwrap();
        assert_eq!(store.average_grade(1).unwrap(), Average::Unavailable);

        store.append_grade(1, 90).unwrap();
        store.append_grade(1, 80).unwrap();
        let avg = store.average_grade(1).unwrap();
        assert_eq!(avg, Average::Mean(85.0));
        assert_eq!(avg.to_string(), "85.00");

        store.remove_record(1).unwrap();
        assert_eq!(store.list_records().count(), 0);
        assert!(store.is_empty());
        assert!(matches!(store.average_grade(1), Err(RosterError::NotFound(1))));
    }

    #[test]
    fn averages_cover_every_student_in_order() {
        let mut store = roster();
        store.append_grade(2, 70).unwrap();
        store.append_grade(2, 71).unwrap();

        let avgs: Vec<_> = store.averages().map(|(id, _, a)| (id, a)).collect();
        assert_eq!(
            avgs,
            vec![
                (1, Average::Unavailable),
                (2, Average::Mean(70.5)),
                (3, Average::Unavailable),
            ]
        );
    }

    #[test]
    fn insert_or_replace_is_last_write_wins() {
        let mut store = RecordStore::new();
        store.insert_or_replace(2, Student::with_grades("Grace", vec![70, 80, 90]));
        store.insert_or_replace(2, Student::with_grades("Grace2", vec![100]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(2), Some(&Student::with_grades("Grace2", vec![100])));
    }
}
