//! Effectful appointment operations using Stillwater 0.11.0.
//!
//! This module is the "imperative shell" around the pure core: it reads
//! the stored appointment, asks `core::apply_transition` for a decision,
//! enforces clinic rules on new slots and writes the result back.
//!
//! # Key Concepts
//!
//! - **Stores**: `AppointmentStore`, `PackageStore` and `PatientDirectory` are the storage seams
//! - **Environment**: `ClinicEnv` bundles the stores, configuration and clock
//! - **Effects**: every operation returns `impl Effect` and runs with `.run(&env)`
//! - **Versioning**: writes compare-and-swap on the appointment version, so two
//!   changes read from the same state cannot both land

mod error;
mod memory;
mod service;
mod store;

pub use error::{ServiceError, StoreError};
pub use memory::InMemoryClinic;
pub use service::{
    change_status, create_appointment, get_appointment, history, legal_next, list_appointments,
    ClinicEnv, StatusChangeRequest,
};
pub use store::{
    select_page, AppointmentFilter, AppointmentStore, Page, PackageStore, PatientDirectory,
};
