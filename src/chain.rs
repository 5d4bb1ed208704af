//! Prerequisite chain scoring.
//!
//! Measures how structurally important a course is in the prerequisite
//! graph:
//!
//! - **forward** (unlocking power): over every course that lists this one
//!   as a prerequisite,
//!   `(1 + forward(dep)) * decay^depth * categoryWeight(dep) * (1 + b * |deps(dep)|)`
//! - **backward** (prerequisite depth): over this course's own
//!   prerequisites, `(1 + backward(pre)) * decay^depth`
//! - **value** = `0.7 * forward + 0.3 * backward`
//!
//! The graph comes from catalog data and may be cyclic. Both traversals
//! carry an explicit depth and the set of courses on the current path; a
//! course already on the path is not entered again, and depth caps bound
//! the work on any input.
//!
//! Results are memoized per course id inside one [`ChainScorer`], which is
//! built fresh for every generation run.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use crate::config::ChainParams;
use crate::models::{Category, Course};

/// Forward, backward and combined chain value of a course.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChainScore {
    pub forward: f64,
    pub backward: f64,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct ChainNode {
    /// `None` for prerequisites referenced but absent from the catalog.
    category: Option<Category>,
}

/// Chain scorer over one catalog. Edges run prerequisite → dependent.
///
/// # Example
/// ```
/// use course_scheduler::chain::ChainScorer;
/// use course_scheduler::config::ChainParams;
/// use course_scheduler::models::{Category, Course};
///
/// let courses = vec![
///     Course::new("A", Category::MajorMandatory),
///     Course::new("B", Category::MajorMandatory).with_prerequisite("A"),
/// ];
/// let params = ChainParams::default();
/// let mut scorer = ChainScorer::new(&courses, &params);
/// // B is a major-mandatory dependent of A with no dependents of its own.
/// assert!((scorer.score("A").forward - 2.0).abs() < 1e-9);
/// assert!((scorer.score("B").backward - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct ChainScorer<'a> {
    graph: DiGraph<ChainNode, ()>,
    nodes: HashMap<String, NodeIndex>,
    params: &'a ChainParams,
    memo: HashMap<String, ChainScore>,
}

impl<'a> ChainScorer<'a> {
    /// Builds the prerequisite graph.
    pub fn new<'c, I>(courses: I, params: &'a ChainParams) -> Self
    where
        I: IntoIterator<Item = &'c Course>,
    {
        let courses: Vec<&Course> = courses.into_iter().collect();
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

        for course in &courses {
            nodes.entry(course.id.clone()).or_insert_with(|| {
                graph.add_node(ChainNode {
                    category: Some(course.category),
                })
            });
        }

        for course in &courses {
            let to = nodes[&course.id];
            for pre in &course.prerequisites {
                let from = *nodes
                    .entry(pre.clone())
                    .or_insert_with(|| graph.add_node(ChainNode { category: None }));
                graph.update_edge(from, to, ());
            }
        }

        Self {
            graph,
            nodes,
            params,
            memo: HashMap::new(),
        }
    }

    /// Chain score of a course (all zeros for unknown ids).
    pub fn score(&mut self, course_id: &str) -> ChainScore {
        if let Some(score) = self.memo.get(course_id) {
            return *score;
        }
        let Some(&idx) = self.nodes.get(course_id) else {
            return ChainScore::default();
        };

        let forward = self.forward(idx, 0, &mut HashSet::new());
        let backward = self.backward(idx, 0, &mut HashSet::new());
        let score = ChainScore {
            forward,
            backward,
            value: self.params.forward_weight * forward + self.params.backward_weight * backward,
        };
        self.memo.insert(course_id.to_string(), score);
        score
    }

    /// Combined chain value of a course.
    pub fn value(&mut self, course_id: &str) -> f64 {
        self.score(course_id).value
    }

    /// Number of courses that list this course as a direct prerequisite.
    pub fn dependent_count(&self, course_id: &str) -> usize {
        self.nodes
            .get(course_id)
            .map(|&idx| self.graph.neighbors_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    fn forward(&self, idx: NodeIndex, depth: u32, path: &mut HashSet<NodeIndex>) -> f64 {
        if depth > self.params.max_forward_depth || !path.insert(idx) {
            return 0.0;
        }

        let decay = self.params.forward_decay.powi(depth as i32);
        let mut total = 0.0;
        for dep in self.graph.neighbors_directed(idx, Direction::Outgoing) {
            if path.contains(&dep) {
                continue;
            }
            let weight = self.params.category_weight(self.graph[dep].category);
            let fan_out = self.graph.neighbors_directed(dep, Direction::Outgoing).count();
            let branching = 1.0 + self.params.branching_bonus * fan_out as f64;
            total += (1.0 + self.forward(dep, depth + 1, path)) * decay * weight * branching;
        }

        path.remove(&idx);
        total
    }

    fn backward(&self, idx: NodeIndex, depth: u32, path: &mut HashSet<NodeIndex>) -> f64 {
        if depth >= self.params.max_backward_depth || !path.insert(idx) {
            return 0.0;
        }

        let decay = self.params.backward_decay.powi(depth as i32);
        let mut total = 0.0;
        for pre in self.graph.neighbors_directed(idx, Direction::Incoming) {
            if path.contains(&pre) {
                continue;
            }
            total += (1.0 + self.backward(pre, depth + 1, path)) * decay;
        }

        path.remove(&idx);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, category: Category, prereqs: &[&str]) -> Course {
        prereqs
            .iter()
            .fold(Course::new(id, category), |c, p| c.with_prerequisite(*p))
    }

    fn chain_catalog() -> Vec<Course> {
        // A → B → C, A → D
        vec![
            course("A", Category::MajorMandatory, &[]),
            course("B", Category::CollegeMandatory, &["A"]),
            course("C", Category::MajorElective, &["B"]),
            course("D", Category::MajorElective, &["A"]),
        ]
    }

    #[test]
    fn test_forward_values() {
        let params = ChainParams::default();
        let catalog = chain_catalog();
        let mut scorer = ChainScorer::new(&catalog, &params);

        // C, D: leaves
        assert!(scorer.score("C").forward.abs() < 1e-12);
        // B: one elective dependent C with no fan-out → (1 + 0) * 1 * 1 * 1
        assert!((scorer.score("B").forward - 1.0).abs() < 1e-9);
        // A at depth 0:
        //   via B: (1 + forward(B at depth 1)) * 1.5 * (1 + 0.2 * 1)
        //     forward(B at depth 1) = (1 + 0) * 0.9 * 1 * 1 = 0.9
        //     → 1.9 * 1.8 = 3.42
        //   via D: 1 * 1 * 1 = 1
        assert!((scorer.score("A").forward - 4.42).abs() < 1e-9);
    }

    #[test]
    fn test_backward_values() {
        let params = ChainParams::default();
        let catalog = chain_catalog();
        let mut scorer = ChainScorer::new(&catalog, &params);

        assert!(scorer.score("A").backward.abs() < 1e-12);
        // C: (1 + backward(B, 1)) * 1, backward(B, 1) = (1 + backward(A, 2)) * 0.7 = 0.7
        assert!((scorer.score("C").backward - 1.7).abs() < 1e-9);
        let c = scorer.score("C");
        assert!((c.value - (0.7 * c.forward + 0.3 * c.backward)).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_across_scorers() {
        let params = ChainParams::default();
        let catalog = chain_catalog();
        let first = ChainScorer::new(&catalog, &params).score("A");
        let mut scorer = ChainScorer::new(&catalog, &params);
        scorer.score("B");
        scorer.score("D");
        let second = scorer.score("A");
        assert_eq!(first, second);
        assert_eq!(second, scorer.score("A"));
    }

    #[test]
    fn test_cycle_terminates() {
        let params = ChainParams::default();
        let catalog = vec![
            course("A", Category::MajorMandatory, &["B"]),
            course("B", Category::MajorMandatory, &["A"]),
            course("S", Category::MajorElective, &["S"]),
        ];
        let mut scorer = ChainScorer::new(&catalog, &params);
        let a = scorer.score("A");
        assert!(a.forward.is_finite() && a.backward.is_finite());
        // A → B; the edge back to A is skipped: (1 + 0) * 2.0 * (1 + 0.2)
        assert!((a.forward - 2.4).abs() < 1e-9);
        assert!((a.backward - 1.0).abs() < 1e-9);
        let s = scorer.score("S");
        assert!(s.value.abs() < 1e-12);
    }

    #[test]
    fn test_depth_cap_bounds_long_chains() {
        let params = ChainParams::default();
        let mut catalog = vec![course("C0", Category::MajorElective, &[])];
        for i in 1..30 {
            let prev = format!("C{}", i - 1);
            catalog.push(course(&format!("C{i}"), Category::MajorElective, &[prev.as_str()]));
        }
        let mut scorer = ChainScorer::new(&catalog, &params);
        let head = scorer.score("C0").forward;
        let shorter = ChainScorer::new(&catalog[..8], &params).score("C0").forward;
        // Only depths 0..=5 contribute, so truncating the tail past 7 links changes nothing.
        assert!((head - shorter).abs() < 1e-9);
        let tail = scorer.score("C29").backward;
        // 1 + 0.7 * (1 + 0.49); depth 3 and beyond contribute nothing
        assert!((tail - 2.043).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_prerequisite_counts_backward() {
        let params = ChainParams::default();
        let catalog = vec![course("X", Category::MajorElective, &["MISSING"])];
        let mut scorer = ChainScorer::new(&catalog, &params);
        assert!((scorer.score("X").backward - 1.0).abs() < 1e-9);
        assert_eq!(scorer.dependent_count("MISSING"), 1);
        assert_eq!(scorer.score("NOPE"), ChainScore::default());
    }
}
