//! Built-in priority rules.
//!
//! # Rules
//!
//! - **Mandatory**: FAILED (retakes dominate everything else)
//! - **Student intent**: IMPROVEMENT, REQUESTED, PREFERENCE
//! - **Structural**: CHAIN, CATEGORY, LAB
//!
//! # Score Convention
//! All rules return higher scores for courses that should be placed first.
//! Magnitudes come from [`PriorityWeights`](crate::config::PriorityWeights).

use super::{PriorityContext, PriorityRule, RuleScore};
use crate::catalog::CatalogEntry;
use crate::eligibility::{Candidate, EligibilityReason};
use crate::models::{Category, Rating};

/// Previously failed course.
///
/// The weight is large enough that no combination of other rules can
/// outrank a failed course.
#[derive(Debug, Clone, Copy)]
pub struct FailedCourse;

impl PriorityRule for FailedCourse {
    fn name(&self) -> &'static str {
        "FAILED"
    }

    fn evaluate(&self, _entry: &CatalogEntry, candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        if candidate.reason == EligibilityReason::Failed {
            context.weights.failed
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Failed course retake"
    }
}

/// Passed course the student wants to retake for a better grade.
#[derive(Debug, Clone, Copy)]
pub struct Improvement;

impl PriorityRule for Improvement {
    fn name(&self) -> &'static str {
        "IMPROVEMENT"
    }

    fn evaluate(&self, _entry: &CatalogEntry, candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        if candidate.reason == EligibilityReason::Improvement {
            context.weights.improvement
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Grade improvement retake"
    }
}

/// Course the student explicitly asked for.
#[derive(Debug, Clone, Copy)]
pub struct Requested;

impl PriorityRule for Requested {
    fn name(&self) -> &'static str {
        "REQUESTED"
    }

    fn evaluate(&self, entry: &CatalogEntry, _candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        if context.preferences.has_requested(entry.id()) {
            context.weights.requested
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Specifically requested course"
    }
}

/// Prerequisite chain value.
///
/// General-mandatory courses with a positive chain value use the large
/// multiplier so that a basic course unlocking many others is placed before
/// ordinary courses.
#[derive(Debug, Clone, Copy)]
pub struct ChainValue;

impl PriorityRule for ChainValue {
    fn name(&self) -> &'static str {
        "CHAIN"
    }

    fn evaluate(&self, entry: &CatalogEntry, _candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        let value = context.chain_score(entry.id()).value;
        if entry.course.category == Category::GeneralMandatory && value > 0.0 {
            value * context.weights.general_chain_multiplier
        } else {
            value * context.weights.chain_multiplier
        }
    }

    fn description(&self) -> &'static str {
        "Prerequisite chain value"
    }
}

/// Fixed weight per course category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryWeight;

impl PriorityRule for CategoryWeight {
    fn name(&self) -> &'static str {
        "CATEGORY"
    }

    fn evaluate(&self, entry: &CatalogEntry, _candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        context.weights.category_weight(entry.course.category)
    }

    fn description(&self) -> &'static str {
        "Course category weight"
    }
}

/// Additive bonus for courses with a lab component.
#[derive(Debug, Clone, Copy)]
pub struct LabBonus;

impl PriorityRule for LabBonus {
    fn name(&self) -> &'static str {
        "LAB"
    }

    fn evaluate(&self, entry: &CatalogEntry, _candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        if entry.course.has_lab() {
            context.weights.lab_bonus
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Lab component bonus"
    }
}

/// Nudge from the student's technical subcategory ratings.
#[derive(Debug, Clone, Copy)]
pub struct SubcategoryPreference;

impl PriorityRule for SubcategoryPreference {
    fn name(&self) -> &'static str {
        "PREFERENCE"
    }

    fn evaluate(&self, entry: &CatalogEntry, _candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore {
        let Some(sub) = entry.course.technical_subcategory() else {
            return 0.0;
        };
        match context.preferences.ratings.rating_for(sub) {
            Rating::Prefer => context.weights.preference_nudge,
            Rating::Dislike => -context.weights.preference_nudge,
            Rating::Neutral => 0.0,
        }
    }

    fn description(&self) -> &'static str {
        "Subcategory rating"
    }
}
