//! Course classification.
//!
//! Categories and subcategories are closed enumerations checked when
//! documents are decoded, so a misspelled category fails at ingestion
//! rather than silently landing in no bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Curriculum category of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// University-wide requirement.
    UniversityMandatory,
    /// University-wide elective (grouped by elective subgroup).
    UniversityElective,
    /// General pass/fail requirement (graded `P`).
    GeneralMandatory,
    /// College (faculty) requirement.
    CollegeMandatory,
    /// Major requirement.
    MajorMandatory,
    /// Major elective.
    MajorElective,
}

impl Category {
    /// All categories in a stable order.
    pub const ALL: [Category; 6] = [
        Category::UniversityMandatory,
        Category::UniversityElective,
        Category::GeneralMandatory,
        Category::CollegeMandatory,
        Category::MajorMandatory,
        Category::MajorElective,
    ];

    /// Basic categories share the per-schedule basic-course cap.
    pub fn is_basic(self) -> bool {
        matches!(
            self,
            Category::UniversityMandatory
                | Category::UniversityElective
                | Category::GeneralMandatory
        )
    }

    /// Wire label (e.g. `"major-mandatory"`).
    pub fn label(self) -> &'static str {
        match self {
            Category::UniversityMandatory => "university-mandatory",
            Category::UniversityElective => "university-elective",
            Category::GeneralMandatory => "general-mandatory",
            Category::CollegeMandatory => "college-mandatory",
            Category::MajorMandatory => "major-mandatory",
            Category::MajorElective => "major-elective",
        }
    }
}

impl FromStr for Category {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| InputError::Category {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Finer classification of a course.
///
/// The four technical subcategories drive preference ratings and progress
/// metrics. Anything else is an elective-group tag, used to cap university
/// electives per group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subcategory {
    Networking,
    Hardware,
    Software,
    Electrical,
    /// Elective subgroup tag.
    ElectiveGroup(String),
}

impl Subcategory {
    /// The technical subcategories, in display order.
    pub const TECHNICAL: [Subcategory; 4] = [
        Subcategory::Networking,
        Subcategory::Hardware,
        Subcategory::Software,
        Subcategory::Electrical,
    ];

    pub fn is_technical(&self) -> bool {
        !matches!(self, Subcategory::ElectiveGroup(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Subcategory::Networking => "networking",
            Subcategory::Hardware => "hardware",
            Subcategory::Software => "software",
            Subcategory::Electrical => "electrical",
            Subcategory::ElectiveGroup(tag) => tag,
        }
    }
}

impl From<String> for Subcategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "networking" => Subcategory::Networking,
            "hardware" => Subcategory::Hardware,
            "software" => Subcategory::Software,
            "electrical" => Subcategory::Electrical,
            _ => Subcategory::ElectiveGroup(value),
        }
    }
}

impl From<Subcategory> for String {
    fn from(value: Subcategory) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
