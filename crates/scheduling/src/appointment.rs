use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use estetica_core::{Aggregate, AggregateId, AggregateRoot, ClientId, DomainError, Event, ProcedureId, UserId};

/// Appointment identifier (user-scoped via `user_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub AggregateId);

impl AppointmentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Appointment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// An open appointment still occupies its time slot.
    pub fn is_open(self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}

/// Aggregate root: Appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    id: AppointmentId,
    user_id: Option<UserId>,
    client_id: Option<ClientId>,
    procedure_id: Option<ProcedureId>,
    scheduled_start: DateTime<Utc>,
    duration_minutes: i64,
    status: AppointmentStatus,
    notes: Option<String>,
    version: u64,
    booked: bool,
}

impl Appointment {
    /// Create an empty, not-yet-booked aggregate instance for rehydration.
    pub fn empty(id: AppointmentId) -> Self {
        Self {
            id,
            user_id: None,
            client_id: None,
            procedure_id: None,
            scheduled_start: DateTime::<Utc>::MIN_UTC,
            duration_minutes: 0,
            status: AppointmentStatus::Scheduled,
            notes: None,
            version: 0,
            booked: false,
        }
    }

    pub fn id_typed(&self) -> AppointmentId {
        self.id
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    pub fn procedure_id(&self) -> Option<ProcedureId> {
        self.procedure_id
    }

    pub fn scheduled_start(&self) -> DateTime<Utc> {
        self.scheduled_start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// End of the occupied slot (exclusive; half-open interval).
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_start + Duration::minutes(self.duration_minutes)
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl AggregateRoot for Appointment {
    type Id = AppointmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: BookAppointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointment {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub client_id: ClientId,
    pub procedure_id: ProcedureId,
    pub scheduled_start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmAppointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmAppointment {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CompleteAppointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteAppointment {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelAppointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAppointment {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkNoShow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkNoShow {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentCommand {
    BookAppointment(BookAppointment),
    ConfirmAppointment(ConfirmAppointment),
    CompleteAppointment(CompleteAppointment),
    CancelAppointment(CancelAppointment),
    MarkNoShow(MarkNoShow),
}

/// Event: AppointmentBooked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentBooked {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub client_id: ClientId,
    pub procedure_id: ProcedureId,
    pub scheduled_start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AppointmentConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentConfirmed {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AppointmentCompleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCompleted {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AppointmentCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCancelled {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AppointmentNoShow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentNoShow {
    pub user_id: UserId,
    pub appointment_id: AppointmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentEvent {
    AppointmentBooked(AppointmentBooked),
    AppointmentConfirmed(AppointmentConfirmed),
    AppointmentCompleted(AppointmentCompleted),
    AppointmentCancelled(AppointmentCancelled),
    AppointmentNoShow(AppointmentNoShow),
}

impl Event for AppointmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AppointmentEvent::AppointmentBooked(_) => "scheduling.appointment.booked",
            AppointmentEvent::AppointmentConfirmed(_) => "scheduling.appointment.confirmed",
            AppointmentEvent::AppointmentCompleted(_) => "scheduling.appointment.completed",
            AppointmentEvent::AppointmentCancelled(_) => "scheduling.appointment.cancelled",
            AppointmentEvent::AppointmentNoShow(_) => "scheduling.appointment.no_show",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AppointmentEvent::AppointmentBooked(e) => e.occurred_at,
            AppointmentEvent::AppointmentConfirmed(e) => e.occurred_at,
            AppointmentEvent::AppointmentCompleted(e) => e.occurred_at,
            AppointmentEvent::AppointmentCancelled(e) => e.occurred_at,
            AppointmentEvent::AppointmentNoShow(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Appointment {
    type Command = AppointmentCommand;
    type Event = AppointmentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AppointmentEvent::AppointmentBooked(e) => {
                self.id = e.appointment_id;
                self.user_id = Some(e.user_id);
                self.client_id = Some(e.client_id);
                self.procedure_id = Some(e.procedure_id);
                self.scheduled_start = e.scheduled_start;
                self.duration_minutes = e.duration_minutes;
                self.status = AppointmentStatus::Scheduled;
                self.notes = e.notes.clone();
                self.booked = true;
            }
            AppointmentEvent::AppointmentConfirmed(_) => {
                self.status = AppointmentStatus::Confirmed;
            }
            AppointmentEvent::AppointmentCompleted(_) => {
                self.status = AppointmentStatus::Completed;
            }
            AppointmentEvent::AppointmentCancelled(_) => {
                self.status = AppointmentStatus::Cancelled;
            }
            AppointmentEvent::AppointmentNoShow(_) => {
                self.status = AppointmentStatus::NoShow;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AppointmentCommand::BookAppointment(cmd) => self.handle_book(cmd),
            AppointmentCommand::ConfirmAppointment(cmd) => self.handle_confirm(cmd),
            AppointmentCommand::CompleteAppointment(cmd) => self.handle_complete(cmd),
            AppointmentCommand::CancelAppointment(cmd) => self.handle_cancel(cmd),
            AppointmentCommand::MarkNoShow(cmd) => self.handle_no_show(cmd),
        }
    }
}

impl Appointment {
    fn ensure_user(&self, user_id: UserId) -> Result<(), DomainError> {
        if !self.booked {
            return Ok(());
        }
        if self.user_id != Some(user_id) {
            return Err(DomainError::invariant("user mismatch"));
        }
        Ok(())
    }

    fn ensure_appointment_id(&self, appointment_id: AppointmentId) -> Result<(), DomainError> {
        if self.id != appointment_id {
            return Err(DomainError::invariant("appointment_id mismatch"));
        }
        Ok(())
    }

    fn ensure_open(&self, user_id: UserId, appointment_id: AppointmentId) -> Result<(), DomainError> {
        if !self.booked {
            return Err(DomainError::not_found());
        }
        self.ensure_user(user_id)?;
        self.ensure_appointment_id(appointment_id)?;
        if !self.status.is_open() {
            return Err(DomainError::conflict(format!(
                "appointment is {:?}, slot is no longer open",
                self.status
            )));
        }
        Ok(())
    }

    fn handle_book(&self, cmd: &BookAppointment) -> Result<Vec<AppointmentEvent>, DomainError> {
        if self.booked {
            return Err(DomainError::conflict("appointment already booked"));
        }
        if cmd.duration_minutes <= 0 {
            return Err(DomainError::validation("duration_minutes must be positive"));
        }
        Ok(vec![AppointmentEvent::AppointmentBooked(AppointmentBooked {
            user_id: cmd.user_id,
            appointment_id: cmd.appointment_id,
            client_id: cmd.client_id,
            procedure_id: cmd.procedure_id,
            scheduled_start: cmd.scheduled_start,
            duration_minutes: cmd.duration_minutes,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm(&self, cmd: &ConfirmAppointment) -> Result<Vec<AppointmentEvent>, DomainError> {
        self.ensure_open(cmd.user_id, cmd.appointment_id)?;
        if self.status != AppointmentStatus::Scheduled {
            return Err(DomainError::conflict("only a scheduled appointment can be confirmed"));
        }
        Ok(vec![AppointmentEvent::AppointmentConfirmed(AppointmentConfirmed {
            user_id: cmd.user_id,
            appointment_id: cmd.appointment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete(&self, cmd: &CompleteAppointment) -> Result<Vec<AppointmentEvent>, DomainError> {
        self.ensure_open(cmd.user_id, cmd.appointment_id)?;
        Ok(vec![AppointmentEvent::AppointmentCompleted(AppointmentCompleted {
            user_id: cmd.user_id,
            appointment_id: cmd.appointment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelAppointment) -> Result<Vec<AppointmentEvent>, DomainError> {
        self.ensure_open(cmd.user_id, cmd.appointment_id)?;
        Ok(vec![AppointmentEvent::AppointmentCancelled(AppointmentCancelled {
            user_id: cmd.user_id,
            appointment_id: cmd.appointment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_no_show(&self, cmd: &MarkNoShow) -> Result<Vec<AppointmentEvent>, DomainError> {
        self.ensure_open(cmd.user_id, cmd.appointment_id)?;
        Ok(vec![AppointmentEvent::AppointmentNoShow(AppointmentNoShow {
            user_id: cmd.user_id,
            appointment_id: cmd.appointment_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
