//! Error types.
//!
//! Expected outcomes (bad preferences, no satisfiable schedule) are *values*
//! carried by [`Outcome`](crate::scheduler::Outcome). The types here cover
//! what is left: parse failures at the ingestion boundary, fatal errors
//! inside a generation run, and illegal schedule status transitions.

use thiserror::Error;

use crate::models::ScheduleStatus;

/// A malformed literal at the document boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Time range not in `"HH:MM - HH:MM"` form, or end not after start.
    #[error("Invalid time range '{value}': {reason}")]
    TimeRange { value: String, reason: String },

    /// Day pattern contains an unknown or repeated weekday.
    #[error("Invalid day pattern '{value}'")]
    DayPattern { value: String },

    /// Semester id not in `"YYYY-N"` form with N in 1..=3.
    #[error("Invalid semester '{value}'")]
    Semester { value: String },

    /// Grade outside the letter-grade vocabulary.
    #[error("Unknown grade '{value}'")]
    Grade { value: String },

    /// Category label outside the fixed set.
    #[error("Unknown category '{value}'")]
    Category { value: String },
}

/// Fatal errors for a single generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An input document could not be decoded.
    #[error("Malformed document: {0}")]
    Document(#[from] serde_json::Error),

    /// Intermediate state is inconsistent; the run cannot continue safely.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GenerationError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        GenerationError::Internal {
            message: message.into(),
        }
    }
}

/// Errors raised by the schedule ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No schedule with this id is recorded for the student.
    #[error("Schedule {schedule_id} not found for student {student_id}")]
    NotFound {
        student_id: String,
        schedule_id: u64,
    },

    /// The requested status change is not allowed from the current status.
    #[error("Schedule {schedule_id} cannot move from {from:?} to {to:?}")]
    IllegalTransition {
        schedule_id: u64,
        from: ScheduleStatus,
        to: ScheduleStatus,
    },
}
