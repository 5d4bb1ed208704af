//! Validation for generator inputs and candidate schedules.
//!
//! Three layers:
//! - [`validate_catalog`]: structural integrity of the catalog and the
//!   section offering (duplicate ids and section labels, unknown
//!   prerequisites, prerequisite cycles). Findings are reported, never fatal.
//! - [`validate_preferences`]: the credit target must lie in the allowed
//!   range before generation starts.
//! - [`validate_schedule`]: independently re-derives every hard constraint
//!   the builder enforces, plus a full pairwise time-conflict scan. The
//!   builder uses it to accept or discard an attempt and the generator runs
//!   it again as the final gate.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::catalog::CatalogIndex;
use crate::config::GeneratorConfig;
use crate::documents::SectionOffering;
use crate::eligibility::rule_violation;
use crate::models::{Category, Course, Preferences, Schedule, StudentRecord};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// An input validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of input validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two catalog courses share the same id.
    DuplicateId,
    /// A course offers two sections with the same label.
    DuplicateSection,
    /// A prerequisite names a course absent from the catalog.
    UnknownPrerequisite,
    /// The prerequisite graph contains a cycle.
    CyclicPrerequisite,
    /// The preferred credit target is outside the allowed range.
    CreditTargetOutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates catalog and offering structure.
///
/// Checks:
/// 1. No duplicate course ids
/// 2. No duplicate section labels within a course
/// 3. Every prerequisite names a catalog course
/// 4. No prerequisite cycles
pub fn validate_catalog(catalog: &[Course], offering: &SectionOffering) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for course in catalog {
        if !ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
    }

    for offered in &offering.courses {
        let mut labels = HashSet::new();
        for section in &offered.sections {
            if !labels.insert(section.label.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateSection,
                    format!("Course '{}' lists section '{}' twice", offered.course_id, section.label),
                ));
            }
        }
    }

    for course in catalog {
        for pre in &course.prerequisites {
            if !ids.contains(pre.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPrerequisite,
                    format!("Course '{}' requires unknown course '{}'", course.id, pre),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(catalog) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Rejects a credit target outside the configured preference range.
pub fn validate_preferences(preferences: &Preferences, config: &GeneratorConfig) -> ValidationResult {
    let bounds = config.preference_credits;
    if bounds.contains(preferences.target_credits) {
        Ok(())
    } else {
        Err(vec![ValidationError::new(
            ValidationErrorKind::CreditTargetOutOfRange,
            format!(
                "Target of {} credit hours is outside [{}, {}]",
                preferences.target_credits, bounds.min, bounds.max
            ),
        )])
    }
}

/// Detects cycles in the prerequisite graph using DFS.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(catalog: &[Course]) -> Option<ValidationError> {
    // prerequisite → dependents
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut all_ids: Vec<&str> = Vec::new();

    for course in catalog {
        all_ids.push(&course.id);
        for pre in &course.prerequisites {
            adj.entry(pre.as_str()).or_default().push(course.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicPrerequisite,
                format!("Circular prerequisite chain involving course '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

// ======================== Schedule validation ========================

/// Hard constraints checked on a candidate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleCheck {
    /// A course appears at most once.
    UniqueCourses,
    /// Total credit hours within the semester's bounds.
    CreditHours,
    /// No two sections overlap on a shared weekday.
    TimeConflicts,
    /// Every failed course is included.
    FailedCourses,
    /// At most one general-mandatory course.
    GeneralMandatory,
    /// Basic-category totals and per-category caps.
    BasicCategories,
    /// Lab count within range (no minimum in summer).
    LabCount,
    /// Major-elective cap.
    MajorElectives,
    /// Per-course registration rules (failed courses exempt).
    SpecialRules,
    /// University-elective caps, cumulative with history.
    UniversityElectives,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: ScheduleCheck,
    pub passed: bool,
    pub reasons: Vec<String>,
}

/// Verdict on a candidate schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleValidation {
    pub valid: bool,
    pub checks: Vec<CheckResult>,
    /// Every failure reason, in check order.
    pub reasons: Vec<String>,
}

impl ScheduleValidation {
    fn from_checks(checks: Vec<CheckResult>) -> Self {
        let reasons: Vec<String> = checks.iter().flat_map(|c| c.reasons.iter().cloned()).collect();
        Self {
            valid: checks.iter().all(|c| c.passed),
            checks,
            reasons,
        }
    }

    /// Result for one check, if it ran.
    pub fn check(&self, check: ScheduleCheck) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.check == check)
    }

    /// Whether a particular check passed.
    pub fn passed(&self, check: ScheduleCheck) -> bool {
        self.check(check).map(|c| c.passed).unwrap_or(false)
    }
}

/// University electives the student has already passed, in total and by
/// elective subgroup.
pub(crate) fn university_elective_history(
    student: &StudentRecord,
    index: &CatalogIndex,
) -> (HashSet<String>, HashMap<String, usize>) {
    let mut passed = HashSet::new();
    let mut groups: HashMap<String, usize> = HashMap::new();
    for attempt in &student.completed {
        let Some(entry) = index.get(&attempt.course_id) else {
            continue;
        };
        let course = &entry.course;
        if course.category != Category::UniversityElective
            || !student.has_passed(&course.id, course.category)
            || !passed.insert(course.id.clone())
        {
            continue;
        }
        if let Some(group) = &course.subcategory {
            *groups.entry(group.label().to_string()).or_default() += 1;
        }
    }
    (passed, groups)
}

fn result(check: ScheduleCheck, reasons: Vec<String>) -> CheckResult {
    CheckResult {
        check,
        passed: reasons.is_empty(),
        reasons,
    }
}

/// Validates a candidate schedule against every hard constraint.
///
/// `index` resolves the categories of courses in the student's history and
/// locates every failed course, offered or not.
///
/// # Example
/// ```
/// use course_scheduler::catalog::CatalogIndex;
/// use course_scheduler::config::GeneratorConfig;
/// use course_scheduler::documents::SectionOffering;
/// use course_scheduler::models::*;
/// use course_scheduler::trace::RunTrace;
/// use course_scheduler::validation::{validate_schedule, ScheduleCheck};
///
/// let semester = Semester::new(2024, Term::First);
/// let index = CatalogIndex::build(&[], &SectionOffering::new(semester), &mut RunTrace::new("s1"));
/// let student = StudentRecord::new("s1");
/// let empty = Schedule::new("s1", semester, 15);
///
/// let verdict = validate_schedule(&empty, &student, &index, &GeneratorConfig::default());
/// assert!(!verdict.valid);
/// assert!(!verdict.passed(ScheduleCheck::CreditHours));
/// assert!(verdict.passed(ScheduleCheck::TimeConflicts));
/// ```
pub fn validate_schedule(
    schedule: &Schedule,
    student: &StudentRecord,
    index: &CatalogIndex,
    config: &GeneratorConfig,
) -> ScheduleValidation {
    let semester = &schedule.semester;
    let mut checks = Vec::with_capacity(10);

    // Unique courses
    let mut seen = HashSet::new();
    let mut reasons = Vec::new();
    for c in &schedule.courses {
        if !seen.insert(c.course_id()) {
            reasons.push(format!("{} is scheduled more than once", c.course_id()));
        }
    }
    checks.push(result(ScheduleCheck::UniqueCourses, reasons));

    // Credit hours
    let bounds = config.credit_bounds(semester);
    let total = schedule.total_credits();
    let reasons = if bounds.contains(total) {
        Vec::new()
    } else {
        vec![format!(
            "{total} credit hours outside [{}, {}] for {semester}",
            bounds.min, bounds.max
        )]
    };
    checks.push(result(ScheduleCheck::CreditHours, reasons));

    // Pairwise time conflicts
    let reasons = schedule
        .conflicting_pairs()
        .into_iter()
        .map(|(a, b)| format!("{a} and {b} overlap"))
        .collect();
    checks.push(result(ScheduleCheck::TimeConflicts, reasons));

    // Every failed course must be present
    let reasons = index
        .iter()
        .filter(|e| student.has_failed(e.id(), e.course.category) && !schedule.contains(e.id()))
        .map(|e| {
            if e.is_offered() {
                format!("failed course {} is missing", e.id())
            } else {
                format!("failed course {} is missing and has no section this semester", e.id())
            }
        })
        .collect();
    checks.push(result(ScheduleCheck::FailedCourses, reasons));

    // General mandatory
    let general = schedule.count_in(Category::GeneralMandatory);
    let reasons = if general > config.max_general_mandatory {
        vec![format!(
            "{general} general-mandatory courses (max {})",
            config.max_general_mandatory
        )]
    } else {
        Vec::new()
    };
    checks.push(result(ScheduleCheck::GeneralMandatory, reasons));

    // Basic categories
    let mut reasons = Vec::new();
    let basic = schedule.basic_count();
    if basic > config.max_basic {
        reasons.push(format!("{basic} basic-category courses (max {})", config.max_basic));
    }
    for category in Category::ALL.iter().filter(|c| c.is_basic()) {
        let n = schedule.count_in(*category);
        if n > config.max_per_basic_category {
            reasons.push(format!(
                "{n} {} courses (max {})",
                category.label(),
                config.max_per_basic_category
            ));
        }
    }
    checks.push(result(ScheduleCheck::BasicCategories, reasons));

    // Labs
    let labs = schedule.lab_count();
    let min_labs = config.min_labs_for(semester);
    let reasons = if labs < min_labs || labs > config.max_labs {
        vec![format!("{labs} lab courses outside [{min_labs}, {}]", config.max_labs)]
    } else {
        Vec::new()
    };
    checks.push(result(ScheduleCheck::LabCount, reasons));

    // Major electives
    let electives = schedule.count_in(Category::MajorElective);
    let reasons = if electives > config.max_major_electives {
        vec![format!(
            "{electives} major electives (max {})",
            config.max_major_electives
        )]
    } else {
        Vec::new()
    };
    checks.push(result(ScheduleCheck::MajorElectives, reasons));

    // Special rules
    let reasons = schedule
        .courses
        .iter()
        .filter(|c| !student.has_failed(c.course_id(), c.course.category))
        .flat_map(|c| {
            config
                .rules_for(c.course_id())
                .iter()
                .filter_map(move |rule| rule_violation(rule, student, semester))
                .map(move |why| format!("{}: {why}", c.course_id()))
        })
        .collect();
    checks.push(result(ScheduleCheck::SpecialRules, reasons));

    // University electives, cumulative
    let (mut taken, mut groups) = university_elective_history(student, index);
    for c in &schedule.courses {
        if c.course.category != Category::UniversityElective || !taken.insert(c.course.id.clone()) {
            continue;
        }
        if let Some(group) = &c.course.subcategory {
            *groups.entry(group.label().to_string()).or_default() += 1;
        }
    }
    let mut reasons = Vec::new();
    if taken.len() > config.max_university_electives {
        reasons.push(format!(
            "{} university electives including history (max {})",
            taken.len(),
            config.max_university_electives
        ));
    }
    let mut over: Vec<_> = groups
        .iter()
        .filter(|(_, n)| **n > config.max_per_elective_group)
        .collect();
    over.sort();
    for (group, n) in over {
        reasons.push(format!(
            "{n} university electives in group {group} (max {})",
            config.max_per_elective_group
        ));
    }
    checks.push(result(ScheduleCheck::UniversityElectives, reasons));

    ScheduleValidation::from_checks(checks)
}
