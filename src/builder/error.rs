//! Build errors for new appointments.

use thiserror::Error;

/// Errors that can occur when building a new appointment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Patient not specified. Call .patient(id) before .build()")]
    MissingPatient,

    #[error("Date not specified. Call .date(\"YYYY-MM-DD\")")]
    MissingDate,

    #[error("Time not specified. Call .time(\"HH:MM\")")]
    MissingTime,

    #[error("Treatment type not specified. Call .treatment_type(name)")]
    MissingTreatmentType,

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
}
