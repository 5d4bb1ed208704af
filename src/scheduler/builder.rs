//! Greedy schedule builder.
//!
//! # Algorithm
//!
//! For each candidate credit target (see [`target_candidates`]):
//!
//! 1. Place every failed course. If one has no conflict-free section the
//!    attempt is abandoned; a required course is never dropped.
//! 2. Place lab courses in priority order until the lab minimum is met.
//! 3. Walk the remaining multi-credit courses by credit hours descending
//!    (priority order within equal credits), adding each one that fits under
//!    the target, respects the category caps and has a conflict-free section.
//! 4. If still under target, fill the gap with 1-credit courses.
//! 5. Run the validator. The first target whose schedule is valid wins.
//!
//! # Complexity
//! O(t * n * s * p) where t=targets (at most 7), n=courses, s=sections per
//! course, p=placed courses.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::config::{CreditBounds, GeneratorConfig};
use crate::models::{
    BreakPreference, Category, Preferences, Schedule, ScheduledCourse, Section, Semester, StudentRecord,
};
use crate::priority::RankedCourse;
use crate::trace::{Phase, RunTrace};
use crate::validation::{university_elective_history, validate_schedule, ScheduleValidation};

/// Minimum idle minutes between classes that counts as a break.
pub const BREAK_MINUTES: u16 = 15;

/// Candidate credit targets, nearest to `target` first.
///
/// Expands outward (`target`, `target+1`, `target-1`, `target+2`, ...) and
/// keeps values inside `bounds`. A target outside the bounds starts from
/// the nearest bound.
///
/// # Example
/// ```
/// use course_scheduler::config::CreditBounds;
/// use course_scheduler::scheduler::target_candidates;
///
/// let bounds = CreditBounds::new(12, 18);
/// assert_eq!(target_candidates(15, bounds), vec![15, 16, 14, 17, 13, 18, 12]);
/// assert_eq!(target_candidates(18, bounds), vec![18, 17, 16, 15, 14, 13, 12]);
/// ```
pub fn target_candidates(target: u32, bounds: CreditBounds) -> Vec<u32> {
    if bounds.min > bounds.max {
        return Vec::new();
    }
    let target = i64::from(target);
    let (min, max) = (i64::from(bounds.min), i64::from(bounds.max));
    let span = (max - target).abs().max((target - min).abs());

    let mut out = Vec::new();
    for d in 0..=span {
        for value in [target + d, target - d] {
            if (min..=max).contains(&value) {
                let value = value as u32;
                if !out.contains(&value) {
                    out.push(value);
                }
            }
        }
    }
    out
}

/// Summary of one build attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    pub target: u32,
    /// Credits placed before validation (0 if aborted).
    pub credits: u32,
    pub courses: usize,
    /// Why the attempt was discarded; empty for the winning attempt.
    pub reasons: Vec<String>,
}

impl AttemptReport {
    pub fn succeeded(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// Result of the builder's search over credit targets.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The first validator-approved schedule, if any.
    pub accepted: Option<(Schedule, ScheduleValidation)>,
    pub attempts: Vec<AttemptReport>,
}

/// Partial schedule plus the cap state needed to extend it.
struct Placement<'a> {
    config: &'a GeneratorConfig,
    schedule: Schedule,
    elective_taken: HashSet<String>,
    elective_groups: HashMap<String, usize>,
}

impl<'a> Placement<'a> {
    fn blocked_by_caps(&self, entry: &CatalogEntry) -> Option<&'static str> {
        let course = &entry.course;
        let config = self.config;
        let schedule = &self.schedule;

        if course.category == Category::GeneralMandatory
            && schedule.count_in(Category::GeneralMandatory) >= config.max_general_mandatory
        {
            return Some("general-mandatory cap");
        }
        if course.category.is_basic()
            && (schedule.basic_count() >= config.max_basic
                || schedule.count_in(course.category) >= config.max_per_basic_category)
        {
            return Some("basic-category cap");
        }
        if course.category == Category::MajorElective
            && schedule.count_in(Category::MajorElective) >= config.max_major_electives
        {
            return Some("major-elective cap");
        }
        if course.category == Category::UniversityElective && !self.elective_taken.contains(&course.id) {
            if self.elective_taken.len() >= config.max_university_electives {
                return Some("university-elective cap");
            }
            if let Some(group) = &course.subcategory {
                let used = self.elective_groups.get(group.label()).copied().unwrap_or(0);
                if used >= config.max_per_elective_group {
                    return Some("elective-group cap");
                }
            }
        }
        if course.has_lab() && schedule.lab_count() >= config.max_labs {
            return Some("lab cap");
        }
        None
    }

    fn add(&mut self, entry: &CatalogEntry, section: Section) {
        let course = &entry.course;
        if course.category == Category::UniversityElective && self.elective_taken.insert(course.id.clone()) {
            if let Some(group) = &course.subcategory {
                *self.elective_groups.entry(group.label().to_string()).or_default() += 1;
            }
        }
        self.schedule
            .add(ScheduledCourse::new(course.clone(), section, entry.credits));
    }
}

/// Builds schedules for one student and semester.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder<'a> {
    config: &'a GeneratorConfig,
    student: &'a StudentRecord,
    preferences: &'a Preferences,
    index: &'a CatalogIndex,
    semester: Semester,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        student: &'a StudentRecord,
        preferences: &'a Preferences,
        index: &'a CatalogIndex,
        semester: Semester,
    ) -> Self {
        Self {
            config,
            student,
            preferences,
            index,
            semester,
        }
    }

    /// Tries each candidate target in turn until one validates.
    pub fn run(&self, ranked: &[RankedCourse], trace: &mut RunTrace) -> BuildOutcome {
        let bounds = self.config.credit_bounds(&self.semester);
        let targets = target_candidates(self.preferences.target_credits, bounds);
        trace.info(
            Phase::Build,
            format!("credit targets to try: {targets:?} (bounds {}-{})", bounds.min, bounds.max),
        );

        let mut attempts = Vec::with_capacity(targets.len());
        for target in targets {
            let schedule = match self.build(target, ranked, trace) {
                Ok(schedule) => schedule,
                Err(reason) => {
                    trace.warn(Phase::Build, format!("target {target} abandoned: {reason}"));
                    attempts.push(AttemptReport {
                        target,
                        credits: 0,
                        courses: 0,
                        reasons: vec![reason],
                    });
                    continue;
                }
            };

            let validation = validate_schedule(&schedule, self.student, self.index, self.config);
            let report = AttemptReport {
                target,
                credits: schedule.total_credits(),
                courses: schedule.course_count(),
                reasons: validation.reasons.clone(),
            };
            attempts.push(report);

            if validation.valid {
                trace.info(
                    Phase::Validation,
                    format!(
                        "target {target} accepted: {} courses, {} credits",
                        schedule.course_count(),
                        schedule.total_credits()
                    ),
                );
                return BuildOutcome {
                    accepted: Some((schedule, validation)),
                    attempts,
                };
            }
            trace.debug(
                Phase::Validation,
                format!("target {target} rejected: {}", validation.reasons.join("; ")),
            );
        }

        BuildOutcome {
            accepted: None,
            attempts,
        }
    }

    /// Builds one schedule aiming at `target` credits.
    ///
    /// `Err` carries the reason the attempt had to be abandoned.
    pub fn build(&self, target: u32, ranked: &[RankedCourse], trace: &mut RunTrace) -> Result<Schedule, String> {
        let (elective_taken, elective_groups) = university_elective_history(self.student, self.index);
        let mut placement = Placement {
            config: self.config,
            schedule: Schedule::new(self.student.id.clone(), self.semester, target),
            elective_taken,
            elective_groups,
        };

        // 1. failed courses
        for course in ranked.iter().filter(|c| c.is_failed()) {
            let section = self
                .choose_section(&course.entry, &placement.schedule)
                .ok_or_else(|| format!("failed course {} has no conflict-free section", course.id()))?;
            placement.add(&course.entry, section);
        }

        // 2. labs up to the minimum
        let min_labs = self.config.min_labs_for(&self.semester);
        for course in ranked.iter().filter(|c| !c.is_failed() && c.entry.course.has_lab()) {
            if placement.schedule.lab_count() >= min_labs {
                break;
            }
            self.try_place(&mut placement, course, target, trace);
        }

        // 3. credit walk, largest first; 1-credit courses wait for step 4
        let mut rest: Vec<&RankedCourse> = ranked
            .iter()
            .filter(|c| !placement.schedule.contains(c.id()))
            .collect();
        rest.sort_by(|a, b| b.entry.credits.cmp(&a.entry.credits));
        let (singles, multi): (Vec<&RankedCourse>, Vec<&RankedCourse>) =
            rest.into_iter().partition(|c| c.entry.credits == 1);
        for course in &multi {
            if placement.schedule.total_credits() >= target {
                break;
            }
            self.try_place(&mut placement, course, target, trace);
        }

        // 4. fine-tune with 1-credit courses
        for course in &singles {
            if placement.schedule.total_credits() >= target {
                break;
            }
            self.try_place(&mut placement, course, target, trace);
        }

        trace.debug(
            Phase::Build,
            format!(
                "target {target}: placed {} courses for {} credits",
                placement.schedule.course_count(),
                placement.schedule.total_credits()
            ),
        );
        Ok(placement.schedule)
    }

    fn try_place(&self, placement: &mut Placement<'_>, course: &RankedCourse, target: u32, trace: &mut RunTrace) -> bool {
        if placement.schedule.contains(course.id())
            || placement.schedule.total_credits() + course.entry.credits > target
        {
            return false;
        }
        if let Some(cap) = placement.blocked_by_caps(&course.entry) {
            trace.debug(Phase::Build, format!("{} skipped: {cap}", course.id()));
            return false;
        }
        match self.choose_section(&course.entry, &placement.schedule) {
            Some(section) => {
                placement.add(&course.entry, section);
                true
            }
            None => {
                trace.debug(Phase::Build, format!("{} skipped: no conflict-free section", course.id()));
                false
            }
        }
    }

    /// Picks a conflict-free section, preferring the student's day pattern,
    /// then their break preference, then catalog order.
    pub fn choose_section(&self, entry: &CatalogEntry, schedule: &Schedule) -> Option<Section> {
        let preferred = self.preferences.preferred_days.pattern();
        entry
            .sections
            .iter()
            .enumerate()
            .filter(|(_, s)| !schedule.conflicts_with(s))
            .min_by_key(|(i, s)| {
                let day_match = preferred.as_ref().is_some_and(|p| &s.days == p);
                (!day_match, !self.matches_breaks(s, schedule), *i)
            })
            .map(|(_, s)| s.clone())
    }

    fn matches_breaks(&self, section: &Section, schedule: &Schedule) -> bool {
        let closest = schedule
            .courses
            .iter()
            .filter_map(|c| c.section.gap_to(section))
            .min();
        match (self.preferences.break_preference, closest) {
            (BreakPreference::Indifferent, _) => true,
            (BreakPreference::Want, None) => true,
            (BreakPreference::Want, Some(gap)) => gap >= BREAK_MINUTES,
            (BreakPreference::DontWant, None) => false,
            (BreakPreference::DontWant, Some(gap)) => gap < BREAK_MINUTES,
        }
    }
}
