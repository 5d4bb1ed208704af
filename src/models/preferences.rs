//! Student scheduling preferences.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{DayPattern, Subcategory};

/// Preferred weekly meeting pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPreference {
    #[serde(rename = "Sunday-Tuesday-Thursday")]
    SundayTuesdayThursday,
    #[serde(rename = "Monday-Wednesday")]
    MondayWednesday,
    #[default]
    #[serde(rename = "any")]
    Any,
}

impl DayPreference {
    /// The concrete pattern, if one is preferred.
    pub fn pattern(self) -> Option<DayPattern> {
        match self {
            DayPreference::SundayTuesdayThursday => {
                Some(DayPattern::new([Weekday::Sun, Weekday::Tue, Weekday::Thu]))
            }
            DayPreference::MondayWednesday => Some(DayPattern::new([Weekday::Mon, Weekday::Wed])),
            DayPreference::Any => None,
        }
    }
}

/// Whether the student wants idle time between classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakPreference {
    Want,
    DontWant,
    #[default]
    Indifferent,
}

/// Rating of a technical subcategory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Prefer,
    #[default]
    Neutral,
    Dislike,
}

/// Ratings for the four technical subcategories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubcategoryRatings {
    pub networking: Rating,
    pub hardware: Rating,
    pub software: Rating,
    pub electrical: Rating,
}

impl SubcategoryRatings {
    /// Rating for a subcategory (neutral for elective groups).
    pub fn rating_for(&self, subcategory: &Subcategory) -> Rating {
        match subcategory {
            Subcategory::Networking => self.networking,
            Subcategory::Hardware => self.hardware,
            Subcategory::Software => self.software,
            Subcategory::Electrical => self.electrical,
            Subcategory::ElectiveGroup(_) => Rating::Neutral,
        }
    }
}

/// A student's stated preferences for the coming term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Requested total credit hours.
    pub target_credits: u32,
    #[serde(default)]
    pub preferred_days: DayPreference,
    #[serde(default, rename = "breaks")]
    pub break_preference: BreakPreference,
    #[serde(default)]
    pub ratings: SubcategoryRatings,
    /// Passed courses to retake for a better grade.
    #[serde(default)]
    pub improvement: Vec<String>,
    /// Courses the student explicitly asks for.
    #[serde(default)]
    pub requested: Vec<String>,
}

impl Preferences {
    /// Creates preferences with only a credit target.
    pub fn new(target_credits: u32) -> Self {
        Self {
            target_credits,
            preferred_days: DayPreference::Any,
            break_preference: BreakPreference::Indifferent,
            ratings: SubcategoryRatings::default(),
            improvement: Vec::new(),
            requested: Vec::new(),
        }
    }

    pub fn with_days(mut self, days: DayPreference) -> Self {
        self.preferred_days = days;
        self
    }

    pub fn with_breaks(mut self, breaks: BreakPreference) -> Self {
        self.break_preference = breaks;
        self
    }

    pub fn with_ratings(mut self, ratings: SubcategoryRatings) -> Self {
        self.ratings = ratings;
        self
    }

    /// Adds a course to retake for improvement.
    pub fn with_improvement(mut self, course_id: impl Into<String>) -> Self {
        self.improvement.push(course_id.into());
        self
    }

    /// Adds a specifically requested course.
    pub fn with_request(mut self, course_id: impl Into<String>) -> Self {
        self.requested.push(course_id.into());
        self
    }

    pub fn wants_improvement(&self, course_id: &str) -> bool {
        self.improvement.iter().any(|c| c == course_id)
    }

    pub fn has_requested(&self, course_id: &str) -> bool {
        self.requested.iter().any(|c| c == course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_json() {
        let json = r#"{"targetCredits":15,"preferredDays":"Monday-Wednesday",
            "breaks":"dont-want","ratings":{"software":"prefer","hardware":"dislike"},
            "improvement":["CS101"],"requested":["CS350"]}"#;
        let p: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(p.target_credits, 15);
        assert_eq!(p.preferred_days, DayPreference::MondayWednesday);
        assert_eq!(p.break_preference, BreakPreference::DontWant);
        assert_eq!(p.ratings.rating_for(&Subcategory::Software), Rating::Prefer);
        assert_eq!(p.ratings.rating_for(&Subcategory::Networking), Rating::Neutral);
        assert!(p.wants_improvement("CS101"));
        assert!(p.has_requested("CS350"));
    }

    #[test]
    fn test_day_preference_pattern() {
        let p = DayPreference::SundayTuesdayThursday.pattern().unwrap();
        assert_eq!(p.to_string(), "Sunday-Tuesday-Thursday");
        assert!(DayPreference::Any.pattern().is_none());
    }
}
