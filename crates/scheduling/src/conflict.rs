//! Appointment conflict detection.
//!
//! Pure interval arithmetic over appointments already fetched for the relevant
//! user and date range. Callers re-run this as the user edits the date/time
//! fields; the computation is idempotent and has no side effects.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use estetica_core::{DomainError, DomainResult, ValueObject};

use crate::appointment::{Appointment, AppointmentId, AppointmentStatus};

/// A candidate time slot, `[starts_at, starts_at + duration_minutes)`.
///
/// Half-open: a window ending exactly when another starts does not overlap it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    starts_at: DateTime<Utc>,
    duration_minutes: i64,
}

impl TimeWindow {
    /// Build a window, rejecting zero-length and negative durations.
    pub fn new(starts_at: DateTime<Utc>, duration_minutes: i64) -> DomainResult<Self> {
        if duration_minutes <= 0 {
            return Err(DomainError::validation("duration_minutes must be positive"));
        }
        Ok(Self {
            starts_at,
            duration_minutes,
        })
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// End of the window (exclusive).
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(self.duration_minutes)
    }

    /// Strict half-open intersection: `[s1, e1)` and `[s2, e2)` overlap iff
    /// `s1 < e2 && s2 < e1`. Boundary-touching windows do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.starts_at < other.ends_at() && other.starts_at < self.ends_at()
    }
}

impl ValueObject for TimeWindow {}

/// Report every appointment whose slot overlaps the candidate window.
///
/// Cancelled appointments no longer occupy their slot and are skipped, as is
/// `exclude` (the appointment currently being edited). The caller is expected
/// to have pre-filtered `existing` to the relevant user and date range.
///
/// Result order follows input order; callers must not rely on it.
pub fn conflicting_appointments<'a>(
    candidate: &TimeWindow,
    existing: &'a [Appointment],
    exclude: Option<AppointmentId>,
) -> Vec<&'a Appointment> {
    let conflicts: Vec<&Appointment> = existing
        .iter()
        .filter(|appointment| Some(appointment.id_typed()) != exclude)
        .filter(|appointment| appointment.status() != AppointmentStatus::Cancelled)
        .filter(|appointment| {
            candidate.starts_at < appointment.ends_at()
                && appointment.scheduled_start() < candidate.ends_at()
        })
        .collect();

    tracing::debug!(
        candidate_start = %candidate.starts_at,
        duration_minutes = candidate.duration_minutes,
        checked = existing.len(),
        conflicts = conflicts.len(),
        "conflict check"
    );

    conflicts
}
