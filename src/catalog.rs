//! Course/section catalog index.
//!
//! Merges catalog metadata with the semester's section offering into one
//! lookup keyed by course id. Courses without numeric credit hours cannot
//! be scheduled and are dropped with a warning.

use std::collections::BTreeMap;

use crate::documents::SectionOffering;
use crate::models::{Course, Section};
use crate::trace::{Phase, RunTrace};

/// A catalog course merged with its offered sections.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub course: Course,
    /// Resolved credit hours.
    pub credits: u32,
    /// Sections offered this semester (empty = not offered).
    pub sections: Vec<Section>,
}

impl CatalogEntry {
    pub fn is_offered(&self) -> bool {
        !self.sections.is_empty()
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.course.id
    }
}

/// Course id → merged entry. Ordered by id for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: BTreeMap<String, CatalogEntry>,
}

impl CatalogIndex {
    /// Builds the index, recording dropped courses and orphan offerings.
    pub fn build(catalog: &[Course], offering: &SectionOffering, trace: &mut RunTrace) -> Self {
        let mut entries = BTreeMap::new();

        for course in catalog {
            let Some(credits) = course.credit_hours else {
                trace.warn(
                    Phase::Catalog,
                    format!("course {} has no numeric credit hours; excluded", course.id),
                );
                continue;
            };
            if entries.contains_key(&course.id) {
                trace.warn(
                    Phase::Catalog,
                    format!("duplicate catalog entry for {}; keeping the first", course.id),
                );
                continue;
            }
            entries.insert(
                course.id.clone(),
                CatalogEntry {
                    course: course.clone(),
                    credits,
                    sections: Vec::new(),
                },
            );
        }

        for offered in &offering.courses {
            match entries.get_mut(&offered.course_id) {
                Some(entry) => entry.sections.extend(offered.sections.iter().cloned()),
                None => trace.warn(
                    Phase::Catalog,
                    format!(
                        "sections offered for {} but the course is not schedulable",
                        offered.course_id
                    ),
                ),
            }
        }

        let index = Self { entries };
        trace.info(
            Phase::Catalog,
            format!(
                "indexed {} courses, {} offered in {}",
                index.len(),
                index.offered().count(),
                offering.semester
            ),
        );
        index
    }

    pub fn get(&self, course_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(course_id)
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.entries.contains_key(course_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by course id.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entries with at least one section this semester.
    pub fn offered(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values().filter(|e| e.is_offered())
    }

    /// Catalog courses, for graph construction.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.entries.values().map(|e| &e.course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Semester, Term};

    fn offering() -> SectionOffering {
        SectionOffering::new(Semester::new(2024, Term::First))
            .with_sections("A", vec![Section::parse("1", "Sunday", "08:00 - 09:00").unwrap()])
            .with_sections("GHOST", vec![Section::new("1")])
    }

    #[test]
    fn test_merge_and_warnings() {
        let catalog = vec![
            Course::new("A", Category::MajorMandatory).with_credits(3),
            Course::new("B", Category::MajorElective).with_credits(3),
            Course::new("NOCR", Category::MajorElective),
        ];
        let mut trace = RunTrace::new("s1");
        let index = CatalogIndex::build(&catalog, &offering(), &mut trace);

        assert_eq!(index.len(), 2);
        assert!(!index.contains("NOCR"));
        assert_eq!(index.get("A").unwrap().sections.len(), 1);
        assert!(!index.get("B").unwrap().is_offered());
        assert_eq!(index.offered().count(), 1);

        let warnings = trace.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("NOCR"));
        assert!(warnings[1].contains("GHOST"));
    }

    #[test]
    fn test_duplicate_course_keeps_first() {
        let catalog = vec![
            Course::new("A", Category::MajorMandatory).with_credits(3),
            Course::new("A", Category::MajorElective).with_credits(1),
        ];
        let mut trace = RunTrace::new("s1");
        let index = CatalogIndex::build(&catalog, &offering(), &mut trace);
        assert_eq!(index.get("A").unwrap().credits, 3);
        assert!(trace.warnings().iter().any(|w| w.contains("duplicate")));
    }

    #[test]
    fn test_empty_catalog() {
        let mut trace = RunTrace::new("s1");
        let index = CatalogIndex::build(&[], &offering(), &mut trace);
        assert!(index.is_empty());
    }
}
