//! Perceived difficulty of a schedule.
//!
//! Per course:
//!
//! ```text
//! min(base(category) * structure * preference * history, CAP)
//! structure = 1 + lab + 0.8*projects + 0.2*quizzes + 0.3*assignments
//!               + 0.5*certificates + exam(type) + mixed_exam_bonus
//! ```
//!
//! Overall score = `sum / (n * CAP) * 100`, mapped to a [`DifficultyBand`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::CatalogIndex;
use crate::models::{Category, Course, ExamType, Preferences, Rating, Schedule, StudentRecord};

/// Upper bound on a single course's difficulty.
pub const COURSE_CAP: f64 = 10.0;

const LAB_WEIGHT: f64 = 1.5;
const PROJECT_WEIGHT: f64 = 0.8;
const QUIZ_WEIGHT: f64 = 0.2;
const ASSIGNMENT_WEIGHT: f64 = 0.3;
const CERTIFICATE_WEIGHT: f64 = 0.5;
const MIXED_EXAM_BONUS: f64 = 0.5;

/// Qualitative difficulty band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyBand {
    Basic,
    Manageable,
    Moderate,
    Challenging,
    VeryChallenging,
}

impl DifficultyBand {
    /// Band for an overall score in 0..=100.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            DifficultyBand::VeryChallenging
        } else if score >= 65.0 {
            DifficultyBand::Challenging
        } else if score >= 45.0 {
            DifficultyBand::Moderate
        } else if score >= 30.0 {
            DifficultyBand::Manageable
        } else {
            DifficultyBand::Basic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DifficultyBand::Basic => "basic",
            DifficultyBand::Manageable => "manageable",
            DifficultyBand::Moderate => "moderate",
            DifficultyBand::Challenging => "challenging",
            DifficultyBand::VeryChallenging => "very challenging",
        }
    }
}

/// Difficulty of one scheduled course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDifficulty {
    pub course_id: String,
    pub score: f64,
}

/// Difficulty of a whole schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyReport {
    /// 0..=100
    pub overall: f64,
    pub band: DifficultyBand,
    pub courses: Vec<CourseDifficulty>,
}

fn base_for(category: Category) -> f64 {
    match category {
        Category::MajorMandatory => 1.2,
        Category::CollegeMandatory => 1.1,
        Category::MajorElective => 1.0,
        Category::UniversityMandatory => 0.8,
        Category::UniversityElective => 0.7,
        Category::GeneralMandatory => 0.6,
    }
}

fn exam_score(exam: ExamType) -> f64 {
    match exam {
        ExamType::Practical => 1.2,
        ExamType::Project => 1.1,
        ExamType::Written => 1.0,
        ExamType::Online => 0.6,
        ExamType::None => 0.0,
    }
}

fn preference_multiplier(course: &Course, preferences: &Preferences) -> f64 {
    match course.technical_subcategory().map(|s| preferences.ratings.rating_for(s)) {
        Some(Rating::Prefer) => 0.8,
        Some(Rating::Dislike) => 1.2,
        _ => 1.0,
    }
}

/// Strong past performance in a category makes its courses feel easier.
fn history_multiplier(average: Option<f64>) -> f64 {
    match average {
        None => 1.0,
        Some(a) if a >= 3.5 => 0.85,
        Some(a) if a >= 3.0 => 0.9,
        Some(a) if a >= 2.5 => 1.0,
        Some(a) if a >= 2.0 => 1.1,
        Some(_) => 1.2,
    }
}

fn structure(course: &Course, mixed_exams: bool) -> f64 {
    let details = course.details.clone().unwrap_or_default();
    let mut total = 1.0;
    if details.has_lab {
        total += LAB_WEIGHT;
    }
    total += PROJECT_WEIGHT * f64::from(details.projects);
    total += QUIZ_WEIGHT * f64::from(details.quizzes);
    total += ASSIGNMENT_WEIGHT * f64::from(details.assignments);
    total += CERTIFICATE_WEIGHT * f64::from(details.certificates);
    total += exam_score(details.exam_type);
    if mixed_exams {
        total += MIXED_EXAM_BONUS;
    }
    total
}

impl DifficultyReport {
    pub fn calculate(
        schedule: &Schedule,
        student: &StudentRecord,
        preferences: &Preferences,
        index: &CatalogIndex,
    ) -> Self {
        // Only declared exams count towards a mix.
        let exam_types: HashSet<ExamType> = schedule
            .courses
            .iter()
            .filter_map(|c| c.course.details.as_ref())
            .map(|d| d.exam_type)
            .filter(|t| *t != ExamType::None)
            .collect();
        let mixed = exam_types.len() > 1;

        let courses: Vec<CourseDifficulty> = schedule
            .courses
            .iter()
            .map(|placed| {
                let course = &placed.course;
                let history = student.average_points(|id| {
                    index
                        .get(id)
                        .is_some_and(|e| e.course.category == course.category)
                });
                let raw = base_for(course.category)
                    * structure(course, mixed)
                    * preference_multiplier(course, preferences)
                    * history_multiplier(history);
                CourseDifficulty {
                    course_id: course.id.clone(),
                    score: raw.min(COURSE_CAP),
                }
            })
            .collect();

        let overall = if courses.is_empty() {
            0.0
        } else {
            let sum: f64 = courses.iter().map(|c| c.score).sum();
            sum / (courses.len() as f64 * COURSE_CAP) * 100.0
        };

        Self {
            overall,
            band: DifficultyBand::from_score(overall),
            courses,
        }
    }
}
