//! Per-run diagnostic trace.
//!
//! Each generation run owns a fresh [`RunTrace`] and returns it with the
//! outcome, so concurrent runs for different students never share log
//! state. Every entry is also emitted as a `tracing` event carrying the
//! phase, for hosts that install a subscriber.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Pipeline phase an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Catalog,
    Eligibility,
    Priority,
    Build,
    Validation,
    Metrics,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Catalog => "catalog",
            Phase::Eligibility => "eligibility",
            Phase::Priority => "priority",
            Phase::Build => "build",
            Phase::Validation => "validation",
            Phase::Metrics => "metrics",
        };
        f.write_str(s)
    }
}

/// Severity of a trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Debug,
    Info,
    Warn,
}

/// A single diagnostic line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub phase: Phase,
    pub level: TraceLevel,
    pub message: String,
}

/// Ordered diagnostics for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTrace {
    /// Student the run was for.
    pub student_id: String,
    pub entries: Vec<TraceEntry>,
}

impl RunTrace {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            entries: Vec::new(),
        }
    }

    fn push(&mut self, phase: Phase, level: TraceLevel, message: String) {
        match level {
            TraceLevel::Debug => debug!(student = %self.student_id, %phase, "{message}"),
            TraceLevel::Info => info!(student = %self.student_id, %phase, "{message}"),
            TraceLevel::Warn => warn!(student = %self.student_id, %phase, "{message}"),
        }
        self.entries.push(TraceEntry {
            phase,
            level,
            message,
        });
    }

    pub fn debug(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(phase, TraceLevel::Debug, message.into());
    }

    pub fn info(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(phase, TraceLevel::Info, message.into());
    }

    pub fn warn(&mut self, phase: Phase, message: impl Into<String>) {
        self.push(phase, TraceLevel::Warn, message.into());
    }

    /// Warning messages, in order.
    pub fn warnings(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.level == TraceLevel::Warn)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Entries for one phase.
    pub fn phase_entries(&self, phase: Phase) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.phase == phase)
    }
}
