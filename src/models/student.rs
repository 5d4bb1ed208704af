//! Student academic record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::Category;
use crate::error::InputError;

/// Letter grade, plus the pass marker `P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    /// Pass (pass/fail courses).
    P,
}

impl Grade {
    /// Failing grades: exactly `F` and `D-`.
    pub fn is_failing(self) -> bool {
        matches!(self, Grade::F | Grade::DMinus)
    }

    /// Whether this grade passes a course of the given category.
    ///
    /// General-mandatory courses pass only on `P`.
    pub fn is_passing(self, category: Category) -> bool {
        if category == Category::GeneralMandatory {
            self == Grade::P
        } else {
            !self.is_failing()
        }
    }

    /// Grade points on a 4.0 scale. `P` carries no points.
    pub fn points(self) -> Option<f64> {
        let p = match self {
            Grade::APlus | Grade::A => 4.0,
            Grade::AMinus => 3.7,
            Grade::BPlus => 3.3,
            Grade::B => 3.0,
            Grade::BMinus => 2.7,
            Grade::CPlus => 2.3,
            Grade::C => 2.0,
            Grade::CMinus => 1.7,
            Grade::DPlus => 1.3,
            Grade::D => 1.0,
            Grade::DMinus => 0.7,
            Grade::F => 0.0,
            Grade::P => return None,
        };
        Some(p)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
            Grade::P => "P",
        }
    }
}

impl FromStr for Grade {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let g = match s.trim() {
            "A+" => Grade::APlus,
            "A" => Grade::A,
            "A-" => Grade::AMinus,
            "B+" => Grade::BPlus,
            "B" => Grade::B,
            "B-" => Grade::BMinus,
            "C+" => Grade::CPlus,
            "C" => Grade::C,
            "C-" => Grade::CMinus,
            "D+" => Grade::DPlus,
            "D" => Grade::D,
            "D-" => Grade::DMinus,
            "F" => Grade::F,
            "P" => Grade::P,
            _ => {
                return Err(InputError::Grade {
                    value: s.to_string(),
                })
            }
        };
        Ok(g)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One attempt at a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttempt {
    pub course_id: String,
    pub grade: Grade,
    /// Semester taken (`"YYYY-N"`), kept verbatim.
    #[serde(default)]
    pub semester: String,
}

/// A student's academic history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    /// Total earned credit hours.
    #[serde(default)]
    pub earned_credits: u32,
    /// All attempts; a course may appear more than once.
    #[serde(default)]
    pub completed: Vec<CourseAttempt>,
}

impl StudentRecord {
    /// Creates an empty record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            earned_credits: 0,
            completed: Vec::new(),
        }
    }

    /// Sets earned credit hours.
    pub fn with_earned_credits(mut self, credits: u32) -> Self {
        self.earned_credits = credits;
        self
    }

    /// Adds an attempt.
    pub fn with_attempt(
        mut self,
        course_id: impl Into<String>,
        grade: Grade,
        semester: impl Into<String>,
    ) -> Self {
        self.completed.push(CourseAttempt {
            course_id: course_id.into(),
            grade,
            semester: semester.into(),
        });
        self
    }

    /// All attempts at a course.
    pub fn attempts_for<'a>(&'a self, course_id: &'a str) -> impl Iterator<Item = &'a CourseAttempt> {
        self.completed.iter().filter(move |a| a.course_id == course_id)
    }

    /// Whether any attempt at the course was taken.
    pub fn has_attempted(&self, course_id: &str) -> bool {
        self.attempts_for(course_id).next().is_some()
    }

    /// Whether some attempt passes the course under its category's rule.
    pub fn has_passed(&self, course_id: &str, category: Category) -> bool {
        self.attempts_for(course_id)
            .any(|a| a.grade.is_passing(category))
    }

    /// Whether the course was failed and not passed since.
    pub fn has_failed(&self, course_id: &str, category: Category) -> bool {
        self.attempts_for(course_id).any(|a| a.grade.is_failing())
            && !self.has_passed(course_id, category)
    }

    /// Prerequisite rule: some attempt with a non-failing grade.
    pub fn satisfies_prerequisite(&self, course_id: &str) -> bool {
        self.attempts_for(course_id).any(|a| !a.grade.is_failing())
    }

    /// Mean grade points over attempts whose course matches `filter`.
    ///
    /// Attempts graded `P` carry no points and are skipped.
    pub fn average_points<F>(&self, mut filter: F) -> Option<f64>
    where
        F: FnMut(&str) -> bool,
    {
        let points: Vec<f64> = self
            .completed
            .iter()
            .filter(|a| filter(&a.course_id))
            .filter_map(|a| a.grade.points())
            .collect();
        if points.is_empty() {
            None
        } else {
            Some(points.iter().sum::<f64>() / points.len() as f64)
        }
    }
}
