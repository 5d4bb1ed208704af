//! Eligibility filter.
//!
//! Decides which offered courses a student may register for this term,
//! independent of time conflicts. A course is eligible when ANY of:
//!
//! 1. it was failed (F or D-) and not passed since; failed courses skip
//!    every other check and are later scheduled mandatorily;
//! 2. it is on the improvement list and was not failed;
//! 3. it was specifically requested;
//! 4. it was never passed, all prerequisites are satisfied, and its
//!    special rules hold.
//!
//! A course already passed and not on the improvement list is never
//! eligible. Special rules apply to every non-failed course.
//!
//! Basic-category courses form their own pool, from which only the single
//! highest chain-value course survives (failed basics are always kept).

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::chain::ChainScorer;
use crate::config::GeneratorConfig;
use crate::models::{CourseRule, Preferences, Semester, StudentRecord};
use crate::trace::{Phase, RunTrace};

/// Why a course is eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityReason {
    Failed,
    Improvement,
    Requested,
    Regular,
}

/// An eligible course.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub course_id: String,
    pub reason: EligibilityReason,
}

impl Candidate {
    pub fn is_failed(&self) -> bool {
        self.reason == EligibilityReason::Failed
    }
}

/// Result of filtering the offered catalog.
#[derive(Debug, Clone, Default)]
pub struct EligibleSet {
    /// Failed basic courses plus at most one other basic course.
    pub basic: Vec<Candidate>,
    /// Eligible non-basic courses.
    pub other: Vec<Candidate>,
    /// Failed courses with no section this semester.
    pub failed_unoffered: Vec<String>,
}

impl EligibleSet {
    /// Both pools, basic first.
    pub fn all(&self) -> impl Iterator<Item = &Candidate> {
        self.basic.iter().chain(self.other.iter())
    }

    pub fn len(&self) -> usize {
        self.basic.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns a description of the violation if `rule` blocks registration.
pub fn rule_violation(rule: &CourseRule, student: &StudentRecord, semester: &Semester) -> Option<String> {
    match rule {
        CourseRule::MinEarnedCredits { credits } if student.earned_credits < *credits => Some(format!(
            "requires {credits} earned credit hours (has {})",
            student.earned_credits
        )),
        CourseRule::NoSummer if semester.is_summer() => Some("not offered to summer registration".into()),
        _ => None,
    }
}

/// Eligibility filter for one student and term.
#[derive(Debug)]
pub struct EligibilityFilter<'a> {
    config: &'a GeneratorConfig,
    student: &'a StudentRecord,
    preferences: &'a Preferences,
    semester: Semester,
}

impl<'a> EligibilityFilter<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        student: &'a StudentRecord,
        preferences: &'a Preferences,
        semester: Semester,
    ) -> Self {
        Self {
            config,
            student,
            preferences,
            semester,
        }
    }

    /// Evaluates one course. `Err` carries the reason it is not eligible.
    pub fn evaluate(&self, entry: &CatalogEntry) -> Result<EligibilityReason, String> {
        let course = &entry.course;
        if self.student.has_failed(&course.id, course.category) {
            return Ok(EligibilityReason::Failed);
        }

        let improvement = self.preferences.wants_improvement(&course.id);
        if !improvement && self.student.has_passed(&course.id, course.category) {
            return Err("already passed".into());
        }

        if let Some(violation) = self
            .config
            .rules_for(&course.id)
            .iter()
            .find_map(|r| rule_violation(r, self.student, &self.semester))
        {
            return Err(violation);
        }

        if improvement {
            return Ok(EligibilityReason::Improvement);
        }
        if self.preferences.has_requested(&course.id) {
            return Ok(EligibilityReason::Requested);
        }

        match course
            .prerequisites
            .iter()
            .find(|p| !self.student.satisfies_prerequisite(p))
        {
            Some(missing) => Err(format!("prerequisite {missing} not satisfied")),
            None => Ok(EligibilityReason::Regular),
        }
    }

    /// Filters the offered catalog into basic and non-basic pools.
    pub fn filter(
        &self,
        index: &CatalogIndex,
        scorer: &mut ChainScorer<'_>,
        trace: &mut RunTrace,
    ) -> EligibleSet {
        let mut set = EligibleSet::default();
        let mut basic_pool: Vec<(Candidate, f64)> = Vec::new();

        for entry in index.iter() {
            let reason = match self.evaluate(entry) {
                Ok(reason) => reason,
                Err(why) => {
                    trace.debug(Phase::Eligibility, format!("{} ineligible: {why}", entry.id()));
                    continue;
                }
            };

            if !entry.is_offered() {
                if reason == EligibilityReason::Failed {
                    trace.warn(
                        Phase::Eligibility,
                        format!("failed course {} has no section this semester", entry.id()),
                    );
                    set.failed_unoffered.push(entry.id().to_string());
                }
                continue;
            }

            let candidate = Candidate {
                course_id: entry.id().to_string(),
                reason,
            };
            if !entry.course.category.is_basic() {
                set.other.push(candidate);
            } else if candidate.is_failed() {
                set.basic.push(candidate);
            } else {
                let value = scorer.value(entry.id());
                basic_pool.push((candidate, value));
            }
        }

        // Index iteration is ordered by id, so ties resolve to the smallest id.
        let best = basic_pool.into_iter().fold(None, |best: Option<(Candidate, f64)>, next| match best {
            Some(b) if b.1 >= next.1 => Some(b),
            _ => Some(next),
        });
        if let Some((candidate, value)) = best {
            trace.debug(
                Phase::Eligibility,
                format!("basic pick {} (chain value {value:.3})", candidate.course_id),
            );
            set.basic.push(candidate);
        }

        trace.info(
            Phase::Eligibility,
            format!(
                "{} eligible ({} basic, {} other, {} failed)",
                set.len(),
                set.basic.len(),
                set.other.len(),
                set.all().filter(|c| c.is_failed()).count()
            ),
        );
        set
    }
}
