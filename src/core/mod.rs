//! Core appointment lifecycle types and logic.
//!
//! This module is the pure functional core:
//! - Lifecycle states via the `State` trait and the appointment status table
//! - The `apply_transition` decision function and its typed errors
//! - Slot values (date, minute-precision time, shift)
//! - Appointment and treatment package records
//! - Immutable status history
//!
//! Nothing in here performs I/O or reads the clock.

mod appointment;
mod error;
mod history;
mod package;
mod slot;
mod state;
mod status;
mod transition;

pub use appointment::Appointment;
pub use error::{InvalidField, RescheduleField, TransitionError, UnknownStatus};
pub use history::{StateHistory, StateTransition};
pub use package::{PackageStatus, TreatmentPackage};
pub use slot::{parse_date, ClockTime, Shift, Slot, DATE_FORMAT};
pub use state::State;
pub use status::AppointmentStatus;
pub use transition::{apply_transition, legal_next, resolve_slot, ReschedulePayload, StatusPatch};
