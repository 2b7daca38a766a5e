//! Stored appointment record.

use super::slot::{ClockTime, Shift, Slot};
use super::state::State;
use super::status::AppointmentStatus;
use super::transition::StatusPatch;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled physiotherapy session.
///
/// `status` only changes through a validated transition, and `date`, `time`
/// and `shift` only change together, on a reschedule. `version` is owned by
/// the store and bumped on every write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    pub status: AppointmentStatus,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub shift: Shift,
    pub treatment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Appointment {
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            time: self.time,
            shift: self.shift,
        }
    }

    /// Statuses this appointment may move to next.
    pub fn legal_next(&self) -> &'static [AppointmentStatus] {
        self.status.successors()
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_final()
    }

    /// Merge a patch, returning the updated record.
    ///
    /// Touches `status` and `updated_at`, plus the slot when the patch
    /// carries one. Nothing else changes; `version` is left to the store.
    pub fn apply(&self, patch: &StatusPatch) -> Self {
        let mut next = self.clone();
        next.status = patch.status;
        next.updated_at = patch.updated_at;
        if let Some(slot) = patch.slot {
            next.date = slot.date;
            next.time = slot.time;
            next.shift = slot.shift;
        }
        next
    }
}
