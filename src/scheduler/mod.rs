//! Schedule construction.
//!
//! [`ScheduleGenerator`] runs the whole pipeline for one student;
//! [`ScheduleBuilder`] is its greedy search core, trying credit targets
//! nearest the student's preference first.
//!
//! # Algorithm
//!
//! The builder is a greedy, priority-driven heuristic: failed courses
//! first, then labs up to the minimum, then the largest courses that fit.
//! It is not optimal, but every schedule it returns has passed the
//! validator.

mod builder;
mod generator;

pub use builder::{target_candidates, AttemptReport, BuildOutcome, ScheduleBuilder, BREAK_MINUTES};
pub use generator::{FailureKind, GenerationFailure, GenerationReport, Outcome, ScheduleGenerator};
