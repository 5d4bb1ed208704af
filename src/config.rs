//! Generator configuration.
//!
//! Institutional constants (credit bounds, lab counts, category caps,
//! special course rules) and heuristic weights. Every field has a default,
//! so a host may load a partial JSON document.
//!
//! ```
//! use course_scheduler::config::GeneratorConfig;
//!
//! let cfg = GeneratorConfig::from_json(r#"{"maxLabs": 2}"#).unwrap();
//! assert_eq!(cfg.max_labs, 2);
//! assert_eq!(cfg.min_labs, 1);
//! assert_eq!(cfg.regular_credits.min, 12);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Category, CourseRule, Semester};

/// Inclusive credit-hour range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBounds {
    pub min: u32,
    pub max: u32,
}

impl CreditBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, credits: u32) -> bool {
        credits >= self.min && credits <= self.max
    }

    pub fn clamp(&self, credits: u32) -> u32 {
        credits.clamp(self.min, self.max)
    }
}

/// Prerequisite chain scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainParams {
    /// Per-level decay of forward (unlocking) value.
    pub forward_decay: f64,
    /// Forward recursion stops beyond this depth.
    pub max_forward_depth: u32,
    /// Per-level decay of backward (prerequisite depth) value.
    pub backward_decay: f64,
    /// Backward recursion stops at this depth.
    pub max_backward_depth: u32,
    /// Bonus per course that depends on a dependent.
    pub branching_bonus: f64,
    pub forward_weight: f64,
    pub backward_weight: f64,
    pub major_mandatory_weight: f64,
    pub college_mandatory_weight: f64,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            forward_decay: 0.9,
            max_forward_depth: 5,
            backward_decay: 0.7,
            max_backward_depth: 3,
            branching_bonus: 0.2,
            forward_weight: 0.7,
            backward_weight: 0.3,
            major_mandatory_weight: 2.0,
            college_mandatory_weight: 1.5,
        }
    }
}

impl ChainParams {
    /// Weight of a dependent course's category in forward scoring.
    pub fn category_weight(&self, category: Option<Category>) -> f64 {
        match category {
            Some(Category::MajorMandatory) => self.major_mandatory_weight,
            Some(Category::CollegeMandatory) => self.college_mandatory_weight,
            _ => 1.0,
        }
    }
}

/// Priority scoring weights. Higher score = scheduled earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityWeights {
    /// Score for previously failed courses (dominates everything else).
    pub failed: f64,
    pub improvement: f64,
    pub requested: f64,
    /// Multiplier on chain value for general-mandatory courses.
    pub general_chain_multiplier: f64,
    /// Multiplier on chain value for every other course.
    pub chain_multiplier: f64,
    pub lab_bonus: f64,
    /// Added for a preferred subcategory, subtracted for a disliked one.
    pub preference_nudge: f64,
    pub category: HashMap<Category, f64>,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        let category = HashMap::from([
            (Category::MajorMandatory, 40.0),
            (Category::CollegeMandatory, 30.0),
            (Category::MajorElective, 20.0),
            (Category::UniversityMandatory, 15.0),
            (Category::GeneralMandatory, 10.0),
            (Category::UniversityElective, 5.0),
        ]);
        Self {
            failed: 1_000_000.0,
            improvement: 10_000.0,
            requested: 5_000.0,
            general_chain_multiplier: 1_000.0,
            chain_multiplier: 10.0,
            lab_bonus: 50.0,
            preference_nudge: 15.0,
            category,
        }
    }
}

impl PriorityWeights {
    pub fn category_weight(&self, category: Category) -> f64 {
        self.category.get(&category).copied().unwrap_or(0.0)
    }
}

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Credit bounds for regular terms (1 and 2).
    pub regular_credits: CreditBounds,
    /// Credit bounds for the summer term.
    pub summer_credits: CreditBounds,
    /// Preference target must lie in this range.
    pub preference_credits: CreditBounds,
    pub min_labs: usize,
    pub max_labs: usize,
    pub max_general_mandatory: usize,
    pub max_basic: usize,
    pub max_per_basic_category: usize,
    pub max_major_electives: usize,
    /// Cap on university electives across history and schedule.
    pub max_university_electives: usize,
    /// Cap on university electives per elective subgroup, across history and schedule.
    pub max_per_elective_group: usize,
    /// Special registration rules by course id.
    pub special_rules: HashMap<String, Vec<CourseRule>>,
    pub chain: ChainParams,
    pub priority: PriorityWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            regular_credits: CreditBounds::new(12, 18),
            summer_credits: CreditBounds::new(3, 9),
            preference_credits: CreditBounds::new(12, 18),
            min_labs: 1,
            max_labs: 3,
            max_general_mandatory: 1,
            max_basic: 2,
            max_per_basic_category: 1,
            max_major_electives: 2,
            max_university_electives: 3,
            max_per_elective_group: 1,
            special_rules: HashMap::new(),
            chain: ChainParams::default(),
            priority: PriorityWeights::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the lab count range for regular terms.
    pub fn with_labs(mut self, min: usize, max: usize) -> Self {
        self.min_labs = min;
        self.max_labs = max;
        self
    }

    pub fn with_regular_credits(mut self, bounds: CreditBounds) -> Self {
        self.regular_credits = bounds;
        self
    }

    pub fn with_summer_credits(mut self, bounds: CreditBounds) -> Self {
        self.summer_credits = bounds;
        self
    }

    pub fn with_max_major_electives(mut self, max: usize) -> Self {
        self.max_major_electives = max;
        self
    }

    /// Adds a special rule for a course.
    pub fn with_rule(mut self, course_id: impl Into<String>, rule: CourseRule) -> Self {
        self.special_rules.entry(course_id.into()).or_default().push(rule);
        self
    }

    pub fn with_chain_params(mut self, chain: ChainParams) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_priority_weights(mut self, priority: PriorityWeights) -> Self {
        self.priority = priority;
        self
    }

    /// Credit bounds for the given semester.
    pub fn credit_bounds(&self, semester: &Semester) -> CreditBounds {
        if semester.is_summer() {
            self.summer_credits
        } else {
            self.regular_credits
        }
    }

    /// Minimum lab count for the given semester (none in summer).
    pub fn min_labs_for(&self, semester: &Semester) -> usize {
        if semester.is_summer() {
            0
        } else {
            self.min_labs
        }
    }

    /// Special rules registered for a course.
    pub fn rules_for(&self, course_id: &str) -> &[CourseRule] {
        self.special_rules
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Term;

    #[test]
    fn test_defaults() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.regular_credits, CreditBounds::new(12, 18));
        assert_eq!((cfg.min_labs, cfg.max_labs), (1, 3));
        assert_eq!(cfg.max_basic, 2);
        assert!((cfg.chain.forward_decay - 0.9).abs() < 1e-10);
        assert!(cfg.priority.failed > cfg.priority.improvement);
        assert!(cfg.priority.improvement > cfg.priority.requested);
    }

    #[test]
    fn test_semester_dependent_bounds() {
        let cfg = GeneratorConfig::default();
        let summer = Semester::new(2024, Term::Summer);
        let regular = Semester::new(2024, Term::Second);
        assert_eq!(cfg.credit_bounds(&summer), cfg.summer_credits);
        assert_eq!(cfg.credit_bounds(&regular), cfg.regular_credits);
        assert_eq!(cfg.min_labs_for(&summer), 0);
        assert_eq!(cfg.min_labs_for(&regular), 1);
    }

    #[test]
    fn test_special_rules() {
        let cfg = GeneratorConfig::new()
            .with_rule("CAP499", CourseRule::MinEarnedCredits { credits: 120 })
            .with_rule("CAP499", CourseRule::NoSummer);
        assert_eq!(cfg.rules_for("CAP499").len(), 2);
        assert!(cfg.rules_for("CS101").is_empty());
    }

    #[test]
    fn test_partial_json() {
        let cfg = GeneratorConfig::from_json(
            r#"{"summerCredits":{"min":1,"max":10},
                "specialRules":{"INT400":[{"rule":"no-summer"}]},
                "chain":{"forwardDecay":0.8}}"#,
        )
        .unwrap();
        assert_eq!(cfg.summer_credits, CreditBounds::new(1, 10));
        assert_eq!(cfg.rules_for("INT400"), &[CourseRule::NoSummer]);
        assert!((cfg.chain.forward_decay - 0.8).abs() < 1e-10);
        assert_eq!(cfg.chain.max_forward_depth, 5);
    }

    #[test]
    fn test_credit_bounds() {
        let b = CreditBounds::new(12, 18);
        assert!(b.contains(12) && b.contains(18));
        assert!(!b.contains(19));
        assert_eq!(b.clamp(20), 18);
        assert_eq!(b.clamp(3), 12);
    }
}
