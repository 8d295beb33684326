//! Appointment statistics for the dashboard.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::appointment::{Appointment, AppointmentStatus};

/// Per-status totals plus rolling today/week/month counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: u64,
    pub scheduled: u64,
    pub confirmed: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub no_show: u64,
    /// Appointments starting on or after the start of `now`'s day.
    pub today_total: u64,
    /// Appointments starting on or after the start of `now`'s week (Sunday).
    pub week_total: u64,
    /// Appointments starting on or after the first of `now`'s month.
    pub month_total: u64,
}

/// Aggregate appointment counters relative to an explicit `now`.
///
/// `now` is a parameter (not read from the clock) so the computation stays
/// deterministic and callers can compute stats for any reference instant.
pub fn appointment_stats(appointments: &[Appointment], now: DateTime<Utc>) -> AppointmentStats {
    let start_of_day = Utc
        .with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        .single()
        .unwrap_or(now);
    let start_of_week =
        start_of_day - Duration::days(i64::from(now.weekday().num_days_from_sunday()));
    let start_of_month = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);

    let mut stats = AppointmentStats::default();
    for appointment in appointments {
        stats.total += 1;

        match appointment.status() {
            AppointmentStatus::Scheduled => stats.scheduled += 1,
            AppointmentStatus::Confirmed => stats.confirmed += 1,
            AppointmentStatus::Completed => stats.completed += 1,
            AppointmentStatus::Cancelled => stats.cancelled += 1,
            AppointmentStatus::NoShow => stats.no_show += 1,
        }

        let start = appointment.scheduled_start();
        if start >= start_of_day {
            stats.today_total += 1;
        }
        if start >= start_of_week {
            stats.week_total += 1;
        }
        if start >= start_of_month {
            stats.month_total += 1;
        }
    }

    tracing::debug!(total = stats.total, "appointment stats computed");
    stats
}
