//! Input documents supplied by the surrounding system.
//!
//! The generator consumes four documents: the course catalog, the
//! semester's section offering, the student profile and the student's
//! preferences. They arrive as camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::models::{Course, Preferences, Section, Semester, StudentRecord};

/// Sections offered for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    pub course_id: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// The section offering document for a semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOffering {
    pub semester: Semester,
    #[serde(default)]
    pub courses: Vec<CourseOffering>,
}

impl SectionOffering {
    pub fn new(semester: Semester) -> Self {
        Self {
            semester,
            courses: Vec::new(),
        }
    }

    /// Adds sections for a course, merging with any already listed.
    pub fn with_sections(mut self, course_id: impl Into<String>, sections: Vec<Section>) -> Self {
        let course_id = course_id.into();
        match self.courses.iter_mut().find(|c| c.course_id == course_id) {
            Some(existing) => existing.sections.extend(sections),
            None => self.courses.push(CourseOffering {
                course_id,
                sections,
            }),
        }
        self
    }

    /// Total number of sections offered.
    pub fn section_count(&self) -> usize {
        self.courses.iter().map(|c| c.sections.len()).sum()
    }
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub catalog: Vec<Course>,
    pub offering: SectionOffering,
    pub student: StudentRecord,
    /// Missing preferences are reported as an input failure, not a parse error.
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl GenerationRequest {
    pub fn new(
        catalog: Vec<Course>,
        offering: SectionOffering,
        student: StudentRecord,
        preferences: Preferences,
    ) -> Self {
        Self {
            catalog,
            offering,
            student,
            preferences: Some(preferences),
        }
    }

    /// Decodes a combined request document.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assembles a request from the four separate documents.
    pub fn from_documents(
        catalog_json: &str,
        offering_json: &str,
        student_json: &str,
        preferences_json: Option<&str>,
    ) -> Result<Self, GenerationError> {
        let preferences = match preferences_json {
            Some(p) => Some(serde_json::from_str(p)?),
            None => None,
        };
        Ok(Self {
            catalog: serde_json::from_str(catalog_json)?,
            offering: serde_json::from_str(offering_json)?,
            student: serde_json::from_str(student_json)?,
            preferences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Term;

    #[test]
    fn test_offering_json() {
        let json = r#"{"semester":"2024-1","courses":[
            {"courseId":"CS101","sections":[
                {"section":"1","days":"Sunday-Tuesday-Thursday","time":"08:00 - 09:00"},
                {"section":"2","days":"Monday-Wednesday","time":"10:00 - 11:30"}]},
            {"courseId":"GEN100"}]}"#;
        let o: SectionOffering = serde_json::from_str(json).unwrap();
        assert_eq!(o.semester, Semester::new(2024, Term::First));
        assert_eq!(o.courses.len(), 2);
        assert_eq!(o.section_count(), 2);
        assert!(o.courses[1].sections.is_empty());
    }

    #[test]
    fn test_with_sections_merges() {
        let o = SectionOffering::new(Semester::new(2024, Term::First))
            .with_sections("A", vec![Section::new("1")])
            .with_sections("A", vec![Section::new("2")]);
        assert_eq!(o.courses.len(), 1);
        assert_eq!(o.section_count(), 2);
    }

    #[test]
    fn test_from_documents() {
        let req = GenerationRequest::from_documents(
            r#"[{"id":"CS101","category":"major-mandatory","creditHours":3}]"#,
            r#"{"semester":"2024-2"}"#,
            r#"{"id":"s1"}"#,
            None,
        )
        .unwrap();
        assert_eq!(req.catalog.len(), 1);
        assert!(req.preferences.is_none());

        let bad = GenerationRequest::from_documents("[", "{}", "{}", None);
        assert!(matches!(bad, Err(GenerationError::Document(_))));
    }
}
