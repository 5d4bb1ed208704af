//! Inputs shared by priority rules.

use std::collections::HashMap;

use crate::chain::{ChainScore, ChainScorer};
use crate::config::PriorityWeights;
use crate::models::Preferences;

/// Per-run state passed to priority rules.
#[derive(Debug, Clone)]
pub struct PriorityContext<'a> {
    pub weights: &'a PriorityWeights,
    pub preferences: &'a Preferences,
    /// Chain scores by course id (missing = zero).
    pub chain: HashMap<String, ChainScore>,
}

impl<'a> PriorityContext<'a> {
    pub fn new(weights: &'a PriorityWeights, preferences: &'a Preferences) -> Self {
        Self {
            weights,
            preferences,
            chain: HashMap::new(),
        }
    }

    /// Records the chain score of a course.
    pub fn with_chain_score(mut self, course_id: impl Into<String>, score: ChainScore) -> Self {
        self.chain.insert(course_id.into(), score);
        self
    }

    /// Scores every listed course with the run's chain scorer.
    pub fn with_chain_scores<'i, I>(mut self, scorer: &mut ChainScorer<'_>, course_ids: I) -> Self
    where
        I: IntoIterator<Item = &'i str>,
    {
        for id in course_ids {
            let score = scorer.score(id);
            self.chain.insert(id.to_string(), score);
        }
        self
    }

    pub fn chain_score(&self, course_id: &str) -> ChainScore {
        self.chain.get(course_id).copied().unwrap_or_default()
    }
}
