//! Course (catalog entity) model.
//!
//! A course is immutable for the duration of a generation run. Its
//! prerequisite list forms the edges of the prerequisite graph, which is
//! NOT assumed to be acyclic.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Category, Subcategory};

/// A catalog course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Curriculum category.
    pub category: Category,
    /// Credit hours. `None` when the document carries no numeric value;
    /// such courses cannot be scheduled.
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub credit_hours: Option<u32>,
    /// Finer classification.
    #[serde(default)]
    pub subcategory: Option<Subcategory>,
    /// Prerequisite course ids, in catalog order.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Structural detail block (assessment counts, lab flag, exam type).
    #[serde(default)]
    pub details: Option<CourseDetails>,
}

/// Assessment structure of a course, used for difficulty scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDetails {
    pub quizzes: u32,
    pub assignments: u32,
    pub projects: u32,
    pub certificates: u32,
    pub has_lab: bool,
    pub exam_type: ExamType,
}

/// How a course is examined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExamType {
    #[default]
    Written,
    Practical,
    Online,
    Project,
    /// No final exam.
    None,
}

/// A per-course registration rule beyond prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum CourseRule {
    /// Student must have earned at least this many credit hours.
    MinEarnedCredits { credits: u32 },
    /// Course may not be taken in the summer term.
    NoSummer,
}

fn numeric_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|v| u32::try_from(v).ok()))
}

impl Course {
    /// Creates a course with the given id and category.
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category,
            credit_hours: None,
            subcategory: None,
            prerequisites: Vec::new(),
            details: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit hours.
    pub fn with_credits(mut self, credit_hours: u32) -> Self {
        self.credit_hours = Some(credit_hours);
        self
    }

    /// Sets the subcategory.
    pub fn with_subcategory(mut self, subcategory: Subcategory) -> Self {
        self.subcategory = Some(subcategory);
        self
    }

    /// Adds a prerequisite course id.
    pub fn with_prerequisite(mut self, course_id: impl Into<String>) -> Self {
        self.prerequisites.push(course_id.into());
        self
    }

    /// Sets the structural detail block.
    pub fn with_details(mut self, details: CourseDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Marks the course as having a lab component.
    pub fn with_lab(mut self) -> Self {
        self.details.get_or_insert_with(CourseDetails::default).has_lab = true;
        self
    }

    /// Whether the course has a lab component.
    pub fn has_lab(&self) -> bool {
        self.details.as_ref().is_some_and(|d| d.has_lab)
    }

    /// Exam type (written when no detail block is present).
    pub fn exam_type(&self) -> ExamType {
        self.details.as_ref().map(|d| d.exam_type).unwrap_or_default()
    }

    /// Whether the course belongs to a technical subcategory.
    pub fn technical_subcategory(&self) -> Option<&Subcategory> {
        self.subcategory.as_ref().filter(|s| s.is_technical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("CS201", Category::MajorMandatory)
            .with_name("Data Structures")
            .with_credits(3)
            .with_subcategory(Subcategory::Software)
            .with_prerequisite("CS101")
            .with_lab();

        assert_eq!(c.id, "CS201");
        assert_eq!(c.credit_hours, Some(3));
        assert_eq!(c.prerequisites, vec!["CS101"]);
        assert!(c.has_lab());
        assert_eq!(c.exam_type(), ExamType::Written);
        assert_eq!(c.technical_subcategory(), Some(&Subcategory::Software));
    }

    #[test]
    fn test_course_json_non_numeric_credits() {
        let json = r#"[
            {"id":"A","category":"major-mandatory","creditHours":3},
            {"id":"B","category":"major-elective","creditHours":"three"},
            {"id":"C","category":"general-mandatory"}
        ]"#;
        let courses: Vec<Course> = serde_json::from_str(json).unwrap();
        assert_eq!(courses[0].credit_hours, Some(3));
        assert_eq!(courses[1].credit_hours, None);
        assert_eq!(courses[2].credit_hours, None);
    }

    #[test]
    fn test_course_details_json() {
        let json = r#"{"id":"EE210","category":"college-mandatory","creditHours":1,
            "subcategory":"electrical",
            "details":{"hasLab":true,"quizzes":4,"examType":"practical"}}"#;
        let c: Course = serde_json::from_str(json).unwrap();
        assert!(c.has_lab());
        assert_eq!(c.exam_type(), ExamType::Practical);
        assert_eq!(c.details.as_ref().unwrap().quizzes, 4);
        assert_eq!(c.details.as_ref().unwrap().projects, 0);
    }

    #[test]
    fn test_course_rule_json() {
        let rules: Vec<CourseRule> = serde_json::from_str(
            r#"[{"rule":"min-earned-credits","credits":120},{"rule":"no-summer"}]"#,
        )
        .unwrap();
        assert_eq!(rules[0], CourseRule::MinEarnedCredits { credits: 120 });
        assert_eq!(rules[1], CourseRule::NoSummer);
    }
}
