//! Clinic appointments: the appointment lifecycle of a physiotherapy practice.
//!
//! Built on Stillwater's "pure core, imperative shell" philosophy. The
//! status table and the transition decision are pure functions with no side
//! effects; storage, clinic-hours rules and the clock live in effects that
//! run against an environment.
//!
//! # Modules
//!
//! - **core**: statuses, the transition table, `apply_transition`, records
//! - **builder**: validated construction of new appointments
//! - **enforcement**: clinic-hours rules that accumulate every violation
//! - **effects**: service operations over pluggable stores
//! - **config**: schedule settings resolved once at startup
//!
//! # Example
//!
//! ```rust
//! use clinic_appointments::builder::AppointmentBuilder;
//! use clinic_appointments::core::AppointmentStatus;
//! use clinic_appointments::effects::{
//!     change_status, create_appointment, InMemoryClinic, StatusChangeRequest,
//! };
//! use stillwater::effect::Effect;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let env = InMemoryClinic::default();
//! let patient = env.register_patient(Uuid::new_v4()).unwrap();
//!
//! let new = AppointmentBuilder::new()
//!     .patient(patient)
//!     .date("2024-06-03")
//!     .time("10:30")
//!     .treatment_type("Post-surgical knee")
//!     .build()
//!     .unwrap();
//!
//! let appointment = create_appointment(new).run(&env).await.unwrap();
//! assert_eq!(appointment.status, AppointmentStatus::New);
//!
//! let scheduled = change_status(appointment.id, StatusChangeRequest::to(AppointmentStatus::Scheduled))
//!     .run(&env)
//!     .await
//!     .unwrap();
//! assert_eq!(scheduled.legal_next(), &[
//!     AppointmentStatus::Confirmed,
//!     AppointmentStatus::Cancelled,
//!     AppointmentStatus::Rescheduled,
//! ]);
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod enforcement;

// Re-export commonly used types
pub use builder::{AppointmentBuilder, BuildError, NewAppointment};
pub use config::{ConfigError, ScheduleConfig};
pub use core::{
    apply_transition, legal_next, Appointment, AppointmentStatus, ReschedulePayload, Shift,
    State, StatusPatch, TransitionError,
};
pub use effects::{ClinicEnv, InMemoryClinic, ServiceError, StatusChangeRequest};
