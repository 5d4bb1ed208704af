//! Priority rules and ranking engine.
//!
//! Every eligible course gets a composite score; the builder consumes
//! courses in descending score order. The ordering that matters is
//! failure > improvement > requested > chain value > category, with a
//! lab bonus and a small subcategory-preference nudge on top.
//!
//! # Usage
//!
//! ```
//! use course_scheduler::priority::{rules, PriorityEngine};
//!
//! let engine = PriorityEngine::new()
//!     .with_rule(rules::FailedCourse)
//!     .with_weighted_rule(rules::LabBonus, 0.5);
//! assert_eq!(engine.rule_count(), 2);
//!
//! let standard = PriorityEngine::standard();
//! assert_eq!(standard.rule_count(), 7);
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::PriorityContext;
pub use engine::{PriorityEngine, RankedCourse};

use std::fmt::Debug;

use crate::catalog::CatalogEntry;
use crate::eligibility::Candidate;

/// Score returned by a priority rule.
///
/// **Higher score = higher priority.**
pub type RuleScore = f64;

/// A rule contributing one term of a course's priority score.
pub trait PriorityRule: Send + Sync + Debug {
    /// Short rule name (e.g. "FAILED").
    fn name(&self) -> &'static str;

    /// Scores an eligible course. Higher = scheduled earlier.
    fn evaluate(&self, entry: &CatalogEntry, candidate: &Candidate, context: &PriorityContext<'_>) -> RuleScore;

    fn description(&self) -> &'static str {
        self.name()
    }
}
