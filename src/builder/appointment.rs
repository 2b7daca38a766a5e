//! Builder for new appointments.

use crate::builder::error::BuildError;
use crate::core::{parse_date, Appointment, AppointmentStatus, ClockTime, Shift, Slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated appointment that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    #[serde(flatten)]
    pub slot: Slot,
    pub treatment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

impl NewAppointment {
    /// Materialize as a stored record in `NEW` at version 1.
    pub fn into_appointment(self, id: Uuid, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            package_id: self.package_id,
            status: AppointmentStatus::New,
            date: self.slot.date,
            time: self.slot.time,
            shift: self.slot.shift,
            treatment_type: self.treatment_type,
            notes: self.notes,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

/// Builder for [`NewAppointment`] with a fluent API.
///
/// Date and time are taken as raw strings and validated in [`build`](Self::build);
/// time accepts the same encodings as a reschedule request.
#[derive(Clone, Debug, Default)]
pub struct AppointmentBuilder {
    patient_id: Option<Uuid>,
    package_id: Option<Uuid>,
    date: Option<String>,
    time: Option<String>,
    shift: Shift,
    treatment_type: Option<String>,
    notes: Option<String>,
    created_by: Option<Uuid>,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the patient (required).
    pub fn patient(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    /// Set the date as `YYYY-MM-DD` (required).
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the start time (required).
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Defaults to `MORNING` when never called.
    pub fn shift(mut self, shift: Shift) -> Self {
        self.shift = shift;
        self
    }

    /// Set the treatment type (required).
    pub fn treatment_type(mut self, treatment_type: impl Into<String>) -> Self {
        self.treatment_type = Some(treatment_type.into());
        self
    }

    /// Draw the session from a treatment package.
    pub fn package(mut self, package_id: Uuid) -> Self {
        self.package_id = Some(package_id);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn created_by(mut self, user_id: Uuid) -> Self {
        self.created_by = Some(user_id);
        self
    }

    /// Validate and build.
    /// Returns the first missing or malformed field.
    pub fn build(self) -> Result<NewAppointment, BuildError> {
        let patient_id = self.patient_id.ok_or(BuildError::MissingPatient)?;

        let raw_date = present(self.date).ok_or(BuildError::MissingDate)?;
        let raw_time = present(self.time).ok_or(BuildError::MissingTime)?;
        let treatment_type =
            present(self.treatment_type).ok_or(BuildError::MissingTreatmentType)?;

        let date = parse_date(&raw_date).ok_or(BuildError::InvalidDate(raw_date))?;
        let time = ClockTime::parse(&raw_time).ok_or(BuildError::InvalidTime(raw_time))?;

        Ok(NewAppointment {
            patient_id,
            package_id: self.package_id,
            slot: Slot {
                date,
                time,
                shift: self.shift,
            },
            treatment_type,
            notes: present(self.notes),
            created_by: self.created_by,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
