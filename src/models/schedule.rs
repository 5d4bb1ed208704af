//! Candidate schedule model.
//!
//! A schedule is an ordered list of course-section pairs. A valid schedule
//! is pairwise time-conflict-free and satisfies every hard constraint
//! checked by [`validate_schedule`](crate::validation::validate_schedule).
//!
//! # Lifecycle
//! `Generated` → `Accepted` | `Rejected`; accepted and generated schedules
//! are superseded to `Inactive` when a newer one is accepted.

use serde::{Deserialize, Serialize};

use super::{Category, Course, Section, Semester};

/// A schedule's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Generated,
    Accepted,
    Rejected,
    Inactive,
}

impl ScheduleStatus {
    /// Whether a student action may move a schedule from `self` to `next`.
    pub fn can_become(self, next: ScheduleStatus) -> bool {
        matches!(
            (self, next),
            (ScheduleStatus::Generated, ScheduleStatus::Accepted)
                | (ScheduleStatus::Generated, ScheduleStatus::Rejected)
        )
    }
}

/// One course placed in a schedule with its chosen section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCourse {
    pub course: Course,
    pub section: Section,
    /// Credit hours as resolved by the catalog index.
    pub credits: u32,
}

impl ScheduledCourse {
    pub fn new(course: Course, section: Section, credits: u32) -> Self {
        Self {
            course,
            section,
            credits,
        }
    }

    #[inline]
    pub fn course_id(&self) -> &str {
        &self.course.id
    }
}

/// A candidate schedule for one student and semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Ledger id (0 until recorded).
    #[serde(default)]
    pub id: u64,
    pub student_id: String,
    pub semester: Semester,
    /// Target credit hours this schedule was built for.
    pub target_credits: u32,
    pub courses: Vec<ScheduledCourse>,
    pub status: ScheduleStatus,
}

impl Schedule {
    /// Creates an empty generated schedule.
    pub fn new(student_id: impl Into<String>, semester: Semester, target_credits: u32) -> Self {
        Self {
            id: 0,
            student_id: student_id.into(),
            semester,
            target_credits,
            courses: Vec::new(),
            status: ScheduleStatus::Generated,
        }
    }

    /// Appends a course-section pair.
    pub fn add(&mut self, entry: ScheduledCourse) {
        self.courses.push(entry);
    }

    /// Sum of credit hours.
    pub fn total_credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.course.id == course_id)
    }

    /// Number of courses in a category.
    pub fn count_in(&self, category: Category) -> usize {
        self.courses
            .iter()
            .filter(|c| c.course.category == category)
            .count()
    }

    /// Number of basic-category courses.
    pub fn basic_count(&self) -> usize {
        self.courses
            .iter()
            .filter(|c| c.course.category.is_basic())
            .count()
    }

    /// Number of courses with a lab component.
    pub fn lab_count(&self) -> usize {
        self.courses.iter().filter(|c| c.course.has_lab()).count()
    }

    /// Whether `section` overlaps any placed section.
    pub fn conflicts_with(&self, section: &Section) -> bool {
        self.courses.iter().any(|c| c.section.conflicts_with(section))
    }

    /// All pairs of course ids whose sections overlap.
    pub fn conflicting_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (i, a) in self.courses.iter().enumerate() {
            for b in &self.courses[i + 1..] {
                if a.section.conflicts_with(&b.section) {
                    pairs.push((a.course_id(), b.course_id()));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Term;

    fn entry(id: &str, category: Category, credits: u32, days: &str, time: &str) -> ScheduledCourse {
        ScheduledCourse::new(
            Course::new(id, category).with_credits(credits),
            Section::parse("1", days, time).unwrap(),
            credits,
        )
    }

    fn sample() -> Schedule {
        let mut s = Schedule::new("s1", Semester::new(2024, Term::First), 9);
        s.add(entry("A", Category::MajorMandatory, 3, "Sunday-Tuesday", "08:00 - 09:30"));
        s.add(entry("B", Category::GeneralMandatory, 3, "Monday-Wednesday", "08:00 - 09:30"));
        s.add(entry("C", Category::UniversityElective, 3, "Tuesday", "09:00 - 10:00"));
        s
    }

    #[test]
    fn test_totals_and_counts() {
        let s = sample();
        assert_eq!(s.total_credits(), 9);
        assert_eq!(s.course_count(), 3);
        assert_eq!(s.basic_count(), 2);
        assert_eq!(s.count_in(Category::MajorMandatory), 1);
        assert!(s.contains("B"));
        assert!(!s.contains("Z"));
        assert_eq!(s.status, ScheduleStatus::Generated);
    }

    #[test]
    fn test_conflicting_pairs() {
        let s = sample();
        assert_eq!(s.conflicting_pairs(), vec![("A", "C")]);
        let candidate = Section::parse("9", "Wednesday", "09:00 - 09:15").unwrap();
        assert!(s.conflicts_with(&candidate));
    }

    #[test]
    fn test_status_transitions() {
        assert!(ScheduleStatus::Generated.can_become(ScheduleStatus::Accepted));
        assert!(ScheduleStatus::Generated.can_become(ScheduleStatus::Rejected));
        assert!(!ScheduleStatus::Accepted.can_become(ScheduleStatus::Rejected));
        assert!(!ScheduleStatus::Rejected.can_become(ScheduleStatus::Accepted));
        assert!(!ScheduleStatus::Inactive.can_become(ScheduleStatus::Accepted));
    }
}
