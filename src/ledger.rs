//! In-memory schedule ledger.
//!
//! Stores every generated schedule per student and applies the student's
//! decisions. Accepting a schedule supersedes the student's other
//! generated and accepted schedules in one step under the student's map
//! entry lock, so concurrent requests for the same student never leave two
//! active schedules behind.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::LedgerError;
use crate::models::{Schedule, ScheduleStatus};

/// Thread-safe store of schedules keyed by student id.
///
/// # Example
/// ```
/// use course_scheduler::ledger::ScheduleLedger;
/// use course_scheduler::models::{Schedule, Semester, Term};
///
/// let ledger = ScheduleLedger::new();
/// let semester = Semester::new(2024, Term::First);
/// let first = ledger.record(Schedule::new("s1", semester, 15));
/// let second = ledger.record(Schedule::new("s1", semester, 12));
///
/// ledger.accept("s1", first).unwrap();
/// ledger.accept("s1", second).unwrap_err(); // superseded by the first acceptance
/// assert_eq!(ledger.active_for("s1").unwrap().id, first);
/// ```
#[derive(Debug)]
pub struct ScheduleLedger {
    schedules: DashMap<String, Vec<Schedule>>,
    next_id: AtomicU64,
}

impl ScheduleLedger {
    pub fn new() -> Self {
        Self {
            schedules: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Stores a schedule as `Generated` and returns its assigned id.
    pub fn record(&self, mut schedule: Schedule) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        schedule.id = id;
        schedule.status = ScheduleStatus::Generated;
        tracing::debug!(student = %schedule.student_id, schedule_id = id, "schedule recorded");
        self.schedules
            .entry(schedule.student_id.clone())
            .or_default()
            .push(schedule);
        id
    }

    /// Accepts a generated schedule and deactivates every other generated
    /// or accepted schedule of the student.
    pub fn accept(&self, student_id: &str, schedule_id: u64) -> Result<(), LedgerError> {
        let mut entry = self
            .schedules
            .get_mut(student_id)
            .ok_or_else(|| not_found(student_id, schedule_id))?;
        let schedules = entry.value_mut();

        let target = schedules
            .iter()
            .find(|s| s.id == schedule_id)
            .ok_or_else(|| not_found(student_id, schedule_id))?;
        check_transition(target, ScheduleStatus::Accepted)?;

        for schedule in schedules.iter_mut() {
            if schedule.id == schedule_id {
                schedule.status = ScheduleStatus::Accepted;
            } else if matches!(schedule.status, ScheduleStatus::Generated | ScheduleStatus::Accepted) {
                schedule.status = ScheduleStatus::Inactive;
            }
        }
        tracing::info!(student = %student_id, schedule_id, "schedule accepted");
        Ok(())
    }

    /// Rejects a generated schedule.
    pub fn reject(&self, student_id: &str, schedule_id: u64) -> Result<(), LedgerError> {
        let mut entry = self
            .schedules
            .get_mut(student_id)
            .ok_or_else(|| not_found(student_id, schedule_id))?;
        let schedule = entry
            .value_mut()
            .iter_mut()
            .find(|s| s.id == schedule_id)
            .ok_or_else(|| not_found(student_id, schedule_id))?;
        check_transition(schedule, ScheduleStatus::Rejected)?;
        schedule.status = ScheduleStatus::Rejected;
        tracing::info!(student = %student_id, schedule_id, "schedule rejected");
        Ok(())
    }

    /// The student's accepted schedule, if any.
    pub fn active_for(&self, student_id: &str) -> Option<Schedule> {
        self.schedules.get(student_id).and_then(|entry| {
            entry
                .iter()
                .find(|s| s.status == ScheduleStatus::Accepted)
                .cloned()
        })
    }

    /// A single schedule by id.
    pub fn get(&self, student_id: &str, schedule_id: u64) -> Option<Schedule> {
        self.schedules
            .get(student_id)
            .and_then(|entry| entry.iter().find(|s| s.id == schedule_id).cloned())
    }

    /// Every schedule recorded for the student, oldest first.
    pub fn schedules_for(&self, student_id: &str) -> Vec<Schedule> {
        self.schedules
            .get(student_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of students with at least one schedule.
    pub fn student_count(&self) -> usize {
        self.schedules.len()
    }
}

impl Default for ScheduleLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(student_id: &str, schedule_id: u64) -> LedgerError {
    LedgerError::NotFound {
        student_id: student_id.to_string(),
        schedule_id,
    }
}

fn check_transition(schedule: &Schedule, to: ScheduleStatus) -> Result<(), LedgerError> {
    if schedule.status.can_become(to) {
        Ok(())
    } else {
        Err(LedgerError::IllegalTransition {
            schedule_id: schedule.id,
            from: schedule.status,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Semester, Term};
    use std::sync::Arc;
    use std::thread;

    fn schedule(student: &str) -> Schedule {
        Schedule::new(student, Semester::new(2024, Term::First), 15)
    }

    #[test]
    fn test_record_assigns_ids() {
        let ledger = ScheduleLedger::new();
        let a = ledger.record(schedule("s1"));
        let b = ledger.record(schedule("s1"));
        let c = ledger.record(schedule("s2"));
        assert!(a < b && b < c);
        assert_eq!(ledger.schedules_for("s1").len(), 2);
        assert_eq!(ledger.student_count(), 2);
        assert_eq!(ledger.get("s1", a).unwrap().status, ScheduleStatus::Generated);
        assert!(ledger.active_for("s1").is_none());
    }

    #[test]
    fn test_accept_supersedes_others() {
        let ledger = ScheduleLedger::new();
        let old = ledger.record(schedule("s1"));
        ledger.accept("s1", old).unwrap();
        let pending = ledger.record(schedule("s1"));
        let newer = ledger.record(schedule("s1"));

        ledger.accept("s1", newer).unwrap();
        assert_eq!(ledger.get("s1", old).unwrap().status, ScheduleStatus::Inactive);
        assert_eq!(ledger.get("s1", pending).unwrap().status, ScheduleStatus::Inactive);
        assert_eq!(ledger.active_for("s1").unwrap().id, newer);
    }

    #[test]
    fn test_reject_and_illegal_transitions() {
        let ledger = ScheduleLedger::new();
        let id = ledger.record(schedule("s1"));
        ledger.reject("s1", id).unwrap();
        assert_eq!(ledger.get("s1", id).unwrap().status, ScheduleStatus::Rejected);

        let err = ledger.accept("s1", id).unwrap_err();
        assert_eq!(
            err,
            LedgerError::IllegalTransition {
                schedule_id: id,
                from: ScheduleStatus::Rejected,
                to: ScheduleStatus::Accepted,
            }
        );
        assert!(matches!(
            ledger.reject("s1", 999),
            Err(LedgerError::NotFound { schedule_id: 999, .. })
        ));
        assert!(matches!(ledger.accept("nobody", id), Err(LedgerError::NotFound { .. })));
    }

    #[test]
    fn test_concurrent_accepts_leave_one_active() {
        let ledger = Arc::new(ScheduleLedger::new());
        let ids: Vec<u64> = (0..8).map(|_| ledger.record(schedule("s1"))).collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.accept("s1", id).is_ok())
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        let active: Vec<_> = ledger
            .schedules_for("s1")
            .into_iter()
            .filter(|s| s.status == ScheduleStatus::Accepted)
            .collect();
        assert_eq!(active.len(), 1);
    }
}
