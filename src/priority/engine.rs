//! Rule engine for composite course priority.
//!
//! Sums weighted rule scores and orders courses highest first, breaking
//! ties by course id so the order is deterministic.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, PriorityContext, PriorityRule, RuleScore};
use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::eligibility::{Candidate, EligibilityReason, EligibleSet};
use crate::error::GenerationError;
use crate::trace::{Phase, RunTrace};

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn PriorityRule>,
    weight: f64,
}

/// An eligible course with its resolved catalog data and priority.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCourse {
    pub entry: CatalogEntry,
    pub reason: EligibilityReason,
    pub score: f64,
}

impl RankedCourse {
    pub fn id(&self) -> &str {
        self.entry.id()
    }

    pub fn is_failed(&self) -> bool {
        self.reason == EligibilityReason::Failed
    }
}

/// A composable engine summing weighted priority rules.
///
/// # Example
/// ```
/// use course_scheduler::priority::{rules, PriorityEngine};
///
/// let engine = PriorityEngine::new()
///     .with_rule(rules::FailedCourse)
///     .with_rule(rules::ChainValue);
/// assert_eq!(engine.rule_names(), vec!["FAILED", "CHAIN"]);
/// ```
#[derive(Clone)]
pub struct PriorityEngine {
    rules: Vec<WeightedRule>,
}

impl PriorityEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with every built-in rule at weight 1.0.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(rules::FailedCourse)
            .with_rule(rules::Improvement)
            .with_rule(rules::Requested)
            .with_rule(rules::ChainValue)
            .with_rule(rules::CategoryWeight)
            .with_rule(rules::LabBonus)
            .with_rule(rules::SubcategoryPreference)
    }

    /// Adds a rule (weight 1.0).
    pub fn with_rule<R: PriorityRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: PriorityRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.name()).collect()
    }

    /// Weighted score of each rule for one course.
    pub fn evaluate(&self, entry: &CatalogEntry, candidate: &Candidate, context: &PriorityContext<'_>) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(entry, candidate, context) * wr.weight)
            .collect()
    }

    /// Composite score for one course.
    pub fn score(&self, entry: &CatalogEntry, candidate: &Candidate, context: &PriorityContext<'_>) -> f64 {
        self.evaluate(entry, candidate, context).into_iter().sum()
    }

    /// Resolves, scores and sorts every eligible course, highest first.
    ///
    /// Fails with an internal error if an eligible course is missing from
    /// the index it was drawn from.
    pub fn rank(
        &self,
        eligible: &EligibleSet,
        index: &CatalogIndex,
        context: &PriorityContext<'_>,
        trace: &mut RunTrace,
    ) -> Result<Vec<RankedCourse>, GenerationError> {
        let mut ranked = Vec::with_capacity(eligible.len());
        for candidate in eligible.all() {
            let entry = index.get(&candidate.course_id).ok_or_else(|| {
                GenerationError::internal(format!(
                    "eligible course {} is missing from the catalog index",
                    candidate.course_id
                ))
            })?;
            let score = self.score(entry, candidate, context);
            ranked.push(RankedCourse {
                entry: entry.clone(),
                reason: candidate.reason,
                score,
            });
        }

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id().cmp(b.id()))
        });

        for (rank, course) in ranked.iter().enumerate() {
            trace.debug(
                Phase::Priority,
                format!("#{} {} score {:.2} ({:?})", rank + 1, course.id(), course.score, course.reason),
            );
        }
        trace.info(Phase::Priority, format!("ranked {} courses", ranked.len()));
        Ok(ranked)
    }
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for PriorityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainScore;
    use crate::config::PriorityWeights;
    use crate::documents::SectionOffering;
    use crate::models::{Category, Course, Preferences, Section, Semester, Term};

    fn index() -> CatalogIndex {
        let catalog = vec![
            Course::new("ELEC", Category::MajorElective).with_credits(3),
            Course::new("MAND", Category::MajorMandatory).with_credits(3),
            Course::new("LAB", Category::MajorElective).with_credits(1).with_lab(),
            Course::new("RETAKE", Category::UniversityElective).with_credits(3),
            Course::new("GEN", Category::GeneralMandatory).with_credits(1),
        ];
        let mut offering = SectionOffering::new(Semester::new(2024, Term::First));
        for c in &catalog {
            offering = offering.with_sections(c.id.clone(), vec![Section::new("1")]);
        }
        CatalogIndex::build(&catalog, &offering, &mut RunTrace::new("t"))
    }

    fn set(ids: &[(&str, EligibilityReason)]) -> EligibleSet {
        EligibleSet {
            other: ids
                .iter()
                .map(|(id, reason)| Candidate {
                    course_id: id.to_string(),
                    reason: *reason,
                })
                .collect(),
            ..EligibleSet::default()
        }
    }

    #[test]
    fn test_standard_ordering() {
        let weights = PriorityWeights::default();
        let prefs = Preferences::new(15);
        let ctx = PriorityContext::new(&weights, &prefs).with_chain_score(
            "GEN",
            ChainScore {
                forward: 1.0,
                backward: 0.0,
                value: 0.7,
            },
        );
        let eligible = set(&[
            ("ELEC", EligibilityReason::Regular),
            ("MAND", EligibilityReason::Regular),
            ("LAB", EligibilityReason::Regular),
            ("RETAKE", EligibilityReason::Failed),
            ("GEN", EligibilityReason::Regular),
        ]);
        let mut trace = RunTrace::new("t");
        let ranked = PriorityEngine::standard()
            .rank(&eligible, &index(), &ctx, &mut trace)
            .unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.id()).collect();
        // RETAKE 1e6+5, GEN 700+10, LAB 20+50, MAND 40, ELEC 20
        assert_eq!(order, vec!["RETAKE", "GEN", "LAB", "MAND", "ELEC"]);
        assert!(ranked[0].is_failed());
        assert_eq!(trace.phase_entries(Phase::Priority).count(), 6);
    }

    #[test]
    fn test_ties_break_by_id() {
        let weights = PriorityWeights::default();
        let prefs = Preferences::new(15);
        let ctx = PriorityContext::new(&weights, &prefs);
        let eligible = set(&[("MAND", EligibilityReason::Regular), ("ELEC", EligibilityReason::Regular)]);
        let engine = PriorityEngine::new().with_rule(rules::LabBonus);
        let ranked = engine.rank(&eligible, &index(), &ctx, &mut RunTrace::new("t")).unwrap();
        assert_eq!(ranked[0].id(), "ELEC");
        assert_eq!(ranked[1].id(), "MAND");
    }

    #[test]
    fn test_weighted_rule_scales_score() {
        let weights = PriorityWeights::default();
        let prefs = Preferences::new(15);
        let ctx = PriorityContext::new(&weights, &prefs);
        let idx = index();
        let entry = idx.get("LAB").unwrap();
        let candidate = Candidate {
            course_id: "LAB".into(),
            reason: EligibilityReason::Regular,
        };
        let engine = PriorityEngine::new()
            .with_weighted_rule(rules::LabBonus, 0.5)
            .with_rule(rules::CategoryWeight);
        assert_eq!(engine.evaluate(entry, &candidate, &ctx), vec![25.0, 20.0]);
        assert_eq!(engine.score(entry, &candidate, &ctx), 45.0);
    }

    #[test]
    fn test_missing_course_is_internal_error() {
        let weights = PriorityWeights::default();
        let prefs = Preferences::new(15);
        let ctx = PriorityContext::new(&weights, &prefs);
        let eligible = set(&[("GHOST", EligibilityReason::Regular)]);
        let err = PriorityEngine::standard()
            .rank(&eligible, &index(), &ctx, &mut RunTrace::new("t"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Internal { .. }));
    }
}
