//! Semester course-schedule generation for university students.
//!
//! Given a course catalog, the sections offered in a semester, a student's
//! academic record and their preferences, produces one conflict-free
//! schedule that satisfies every registration constraint, or a structured
//! explanation of why none exists.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Section`, `StudentRecord`,
//!   `Preferences`, `Schedule`, `Semester`
//! - **`documents`**: Input documents and the combined `GenerationRequest`
//! - **`config`**: `GeneratorConfig` with credit bounds, caps, chain and priority weights
//! - **`catalog`**: Joins courses with offered sections into a `CatalogIndex`
//! - **`chain`**: Prerequisite-chain value scoring over a petgraph DAG
//! - **`eligibility`**: Which courses the student may take this semester
//! - **`priority`**: Weighted priority rules ranking eligible courses
//! - **`scheduler`**: Greedy builder and the end-to-end `ScheduleGenerator`
//! - **`validation`**: Input integrity checks and the schedule validator
//! - **`metrics`**: Difficulty, balance, distribution and progress
//! - **`ledger`**: Concurrent store applying accept/reject decisions
//! - **`trace`**: Per-run diagnostic trace mirrored to `tracing`
//!
//! # Pipeline
//!
//! ```text
//! request ─▶ validate inputs ─▶ CatalogIndex ─▶ eligibility ─▶ priority ranking
//!                                                                   │
//!        metrics ◀─ final validation ◀─ builder (targets nearest first)
//! ```
//!
//! # Example
//!
//! ```
//! use course_scheduler::documents::{GenerationRequest, SectionOffering};
//! use course_scheduler::models::*;
//! use course_scheduler::scheduler::ScheduleGenerator;
//!
//! let semester = Semester::new(2024, Term::First);
//! let request = GenerationRequest::new(
//!     vec![Course::new("CS101", Category::MajorMandatory).with_credits(3)],
//!     SectionOffering::new(semester).with_sections("CS101", vec![Section::new("1")]),
//!     StudentRecord::new("s1"),
//!     Preferences::new(15),
//! );
//!
//! // A single three-credit course cannot reach the twelve-hour minimum.
//! let report = ScheduleGenerator::default().generate(&request).unwrap();
//! assert!(!report.is_generated());
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod catalog;
pub mod chain;
pub mod config;
pub mod documents;
pub mod eligibility;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod priority;
pub mod scheduler;
pub mod trace;
pub mod validation;
