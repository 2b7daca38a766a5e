//! Fluent construction of new appointments.
//!
//! Raw request values go in, a validated [`NewAppointment`] comes out. The
//! builder never touches storage; the service assigns the id and persists it.

pub mod appointment;
pub mod error;

pub use appointment::{AppointmentBuilder, NewAppointment};
pub use error::BuildError;
