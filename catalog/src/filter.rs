//! Client-side course filtering.
//!
//! Empty selections impose no constraint. Categories combine with AND,
//! values inside one category with OR.

use serde::{Deserialize, Serialize};

use crate::records::Course;

/// Whether `course` passes the selected subjects, difficulties and grades.
pub fn matches<S, D>(course: &Course, subjects: &[S], difficulties: &[D], grades: &[u32]) -> bool
where
    S: AsRef<str>,
    D: AsRef<str>,
{
    let subject_ok = subjects.is_empty()
        || course
            .subjects
            .iter()
            .any(|s| subjects.iter().any(|sel| sel.as_ref() == s.as_str()));

    let difficulty_ok = difficulties.is_empty()
        || course
            .difficulty
            .as_deref()
            .is_some_and(|d| difficulties.iter().any(|sel| sel.as_ref() == d));

    let grade_ok = grades.is_empty() || course.grades.iter().any(|g| grades.contains(g));

    subject_ok && difficulty_ok && grade_ok
}

/// The visitor's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseFilters {
    pub subject_types: Vec<String>,
    pub difficulty_types: Vec<String>,
    pub grades: Vec<u32>,
}

impl CourseFilters {
    pub fn is_empty(&self) -> bool {
        self.subject_types.is_empty() && self.difficulty_types.is_empty() && self.grades.is_empty()
    }

    pub fn matches(&self, course: &Course) -> bool {
        matches(
            course,
            self.subject_types.as_slice(),
            self.difficulty_types.as_slice(),
            &self.grades,
        )
    }

    /// Select `kind`, or deselect it when already selected.
    pub fn toggle_subject(&mut self, kind: &str) {
        toggle(&mut self.subject_types, kind.to_string());
    }

    pub fn toggle_difficulty(&mut self, kind: &str) {
        toggle(&mut self.difficulty_types, kind.to_string());
    }

    pub fn toggle_grade(&mut self, grade: u32) {
        toggle(&mut self.grades, grade);
    }
}

fn toggle<T: PartialEq>(selected: &mut Vec<T>, value: T) {
    match selected.iter().position(|v| *v == value) {
        Some(i) => {
            selected.remove(i);
        }
        None => selected.push(value),
    }
}

/// Courses passing `filters`, in input order.
pub fn filter_courses<'a>(courses: &'a [Course], filters: &CourseFilters) -> Vec<&'a Course> {
    if filters.is_empty() {
        return courses.iter().collect();
    }
    courses.iter().filter(|c| filters.matches(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    fn course(subjects: &[&str], difficulty: Option<&str>, grades: &[u32]) -> Course {
        Course {
            title: "course".into(),
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            difficulty: difficulty.map(str::to_string),
            grades: grades.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_selection_matches_everything() {
        let c = course(&[], None, &[]);
        assert!(matches(&c, NONE, NONE, &[]));
    }

    #[test]
    fn test_subject_intersection() {
        let c = course(&["ai", "programming"], Some("beginner"), &[9]);
        assert!(!matches(&c, &["robotics"], NONE, &[]));
        assert!(matches(&c, &["ai"], NONE, &[]));
        assert!(matches(&c, &["robotics", "programming"], NONE, &[]));
    }

    #[test]
    fn test_absent_difficulty_never_matches_a_selection() {
        let c = course(&["ai"], None, &[9]);
        assert!(!matches(&c, NONE, &["beginner"], &[]));
        assert!(matches(&c, NONE, NONE, &[]));
    }

    #[test]
    fn test_categories_are_conjunctive() {
        let c = course(&["ai"], Some("advanced"), &[10, 11]);
        assert!(matches(&c, &["ai"], &["advanced"], &[11]));
        assert!(!matches(&c, &["ai"], &["advanced"], &[5]));
    }

    #[test]
    fn test_toggle_and_filter_keep_order() {
        let courses = vec![
            course(&["math"], Some("beginner"), &[5]),
            course(&["ai"], Some("advanced"), &[10]),
            course(&["math", "ai"], Some("advanced"), &[7]),
        ];
        let mut filters = CourseFilters::default();
        filters.toggle_subject("ai");
        filters.toggle_difficulty("advanced");
        let found = filter_courses(&courses, &filters);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].subjects, ["ai"]);

        filters.toggle_subject("ai");
        filters.toggle_difficulty("advanced");
        assert!(filters.is_empty());
        assert_eq!(filter_courses(&courses, &filters).len(), 3);
    }
}
