//! Schedule quality metrics.
//!
//! Computed once on the accepted schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Difficulty | Capped per-course structural score, averaged to 0..100 and banded |
//! | Balance | Distance of category counts from their target ranges (0.7 category, 0.3 subcategory) |
//! | Distribution | Share of credit hours per category and technical subcategory |
//! | Progress | Passed / scheduled / remaining courses per technical subcategory |

mod balance;
mod difficulty;
mod distribution;

pub use balance::{category_target, range_score, BalanceReport, GroupBalance, SUBCATEGORY_TARGET};
pub use difficulty::{CourseDifficulty, DifficultyBand, DifficultyReport, COURSE_CAP};
pub use distribution::{Distribution, SubcategoryProgress};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogIndex;
use crate::models::{Preferences, Schedule, StudentRecord};

/// Every metric for one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub difficulty: DifficultyReport,
    pub balance: BalanceReport,
    pub distribution: Distribution,
    pub progress: Vec<SubcategoryProgress>,
}

impl ScheduleMetrics {
    /// Computes all metrics for a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The accepted schedule.
    /// * `student` - History for the performance multiplier and progress.
    /// * `preferences` - Subcategory ratings for the preference multiplier.
    /// * `index` - Resolves categories of historical courses.
    pub fn calculate(
        schedule: &Schedule,
        student: &StudentRecord,
        preferences: &Preferences,
        index: &CatalogIndex,
    ) -> Self {
        Self {
            difficulty: DifficultyReport::calculate(schedule, student, preferences, index),
            balance: BalanceReport::calculate(schedule),
            distribution: Distribution::calculate(schedule),
            progress: SubcategoryProgress::calculate_all(schedule, student, index),
        }
    }

    /// One-line summary for diagnostics.
    pub fn summary(&self) -> String {
        format!(
            "difficulty {:.1} ({}), balance {:.1}",
            self.difficulty.overall,
            self.difficulty.band.label(),
            self.balance.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::SectionOffering;
    use crate::models::{Category, Course, ScheduledCourse, Section, Semester, Term};
    use crate::trace::RunTrace;

    #[test]
    fn test_calculate_all_metrics() {
        let semester = Semester::new(2024, Term::First);
        let index = CatalogIndex::build(&[], &SectionOffering::new(semester), &mut RunTrace::new("s1"));
        let mut s = Schedule::new("s1", semester, 12);
        for id in ["A", "B", "C", "D"] {
            s.add(ScheduledCourse::new(
                Course::new(id, Category::MajorMandatory).with_credits(3),
                Section::new("1"),
                3,
            ));
        }

        let m = ScheduleMetrics::calculate(&s, &StudentRecord::new("s1"), &Preferences::new(12), &index);
        assert_eq!(m.difficulty.courses.len(), 4);
        assert_eq!(m.distribution.categories[&Category::MajorMandatory], 100.0);
        assert_eq!(m.progress.len(), 4);
        // College mandatory is one short: 80; everything else in range.
        assert!((m.balance.category_score - 580.0 / 6.0).abs() < 1e-9);
        assert!(m.summary().starts_with("difficulty"));

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["difficulty"]["band"], "basic");
    }
}
