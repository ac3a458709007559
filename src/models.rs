use std::fmt;

/// Key a student is filed under in the roster.
pub type StudentId = i32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    /// In entry order; only ever appended to.
    pub grades: Vec<i32>,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Student { name: name.into(), grades: Vec::new() }
    }

    pub fn with_grades(name: impl Into<String>, grades: Vec<i32>) -> Self {
        Student { name: name.into(), grades }
    }

    /// Mean of the recorded grades, or `Average::Unavailable` when there are none.
    pub fn average(&self) -> Average {
        if self.grades.is_empty() {
            return Average::Unavailable;
        }
        let sum: f64 = self.grades.iter().map(|&g| f64::from(g)).sum();
        Average::Mean(sum / self.grades.len() as f64)
    }

    /// Grades rendered the way the roster table shows them: `90 80 75`.
    pub fn grades_line(&self) -> String {
        self.grades
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The on-disk format splits on whitespace, so such names cannot be read back intact.
    pub fn name_is_persistable(&self) -> bool {
        !self.name.is_empty() && !self.name.chars().any(char::is_whitespace)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Mean(f64),
    Unavailable,
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Mean(v) => write!(f, "{:.2}", v),
            Average::Unavailable => write!(f, "no grades"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_grades_is_unavailable() {
        let s = Student::new("Ada");
        assert_eq!(s.average(), Average::Unavailable);
        assert_eq!(s.average().to_string(), "no grades");
    }

    #[test]
    fn average_formats_with_two_decimals() {
        let s = Student::with_grades("Ada", vec![90, 80, 81]);
        assert_eq!(s.average().to_string(), "83.67");
    }

    #[test]
    fn average_does_not_overflow_on_extreme_grades() {
        let s = Student::with_grades("Max", vec![i32::MAX, i32::MAX]);
        assert_eq!(s.average(), Average::Mean(f64::from(i32::MAX)));
    }

    #[test]
    fn whitespace_and_empty_names_are_not_persistable() {
        assert!(Student::new("Grace").name_is_persistable());
        assert!(!Student::new("Grace Hopper").name_is_persistable());
        assert!(!Student::new("").name_is_persistable());
    }

    #[test]
    fn grades_line_joins_with_spaces() {
        let s = Student::with_grades("Ada", vec![70, -3, 100]);
        assert_eq!(s.grades_line(), "70 -3 100");
    }
}
