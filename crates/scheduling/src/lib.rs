//! Scheduling domain module.
//!
//! This crate contains the appointment booking lifecycle and the slot
//! conflict checker, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod appointment;
pub mod conflict;
pub mod stats;

pub use appointment::{
    Appointment, AppointmentCommand, AppointmentEvent, AppointmentId, AppointmentStatus,
    BookAppointment, CancelAppointment, CompleteAppointment, ConfirmAppointment, MarkNoShow,
};
pub use conflict::{conflicting_appointments, TimeWindow};
pub use stats::{appointment_stats, AppointmentStats};
