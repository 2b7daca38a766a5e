//! Appointment status enumeration and its transition table.

use super::error::UnknownStatus;
use super::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an appointment.
///
/// Appointments are created in [`AppointmentStatus::New`]. `Attended`,
/// `NoShow` and `Cancelled` are absorbing; `Rescheduled` marks a pending
/// date/time change and must advance back to `Scheduled` or be cancelled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    New,
    Scheduled,
    Confirmed,
    Attended,
    NoShow,
    Cancelled,
    Rescheduled,
}

use AppointmentStatus::*;

const FROM_NEW: &[AppointmentStatus] = &[Scheduled, Cancelled];
const FROM_SCHEDULED: &[AppointmentStatus] = &[Confirmed, Cancelled, Rescheduled];
const FROM_CONFIRMED: &[AppointmentStatus] = &[Attended, NoShow, Cancelled];
const FROM_RESCHEDULED: &[AppointmentStatus] = &[Scheduled, Cancelled];
const TERMINAL: &[AppointmentStatus] = &[];

impl AppointmentStatus {
    /// Every status, in declaration order.
    pub const ALL: [AppointmentStatus; 7] = [
        New,
        Scheduled,
        Confirmed,
        Attended,
        NoShow,
        Cancelled,
        Rescheduled,
    ];
}

impl State for AppointmentStatus {
    fn name(&self) -> &'static str {
        match self {
            New => "NEW",
            Scheduled => "SCHEDULED",
            Confirmed => "CONFIRMED",
            Attended => "ATTENDED",
            NoShow => "NO_SHOW",
            Cancelled => "CANCELLED",
            Rescheduled => "RESCHEDULED",
        }
    }

    fn successors(&self) -> &'static [Self] {
        match self {
            New => FROM_NEW,
            Scheduled => FROM_SCHEDULED,
            Confirmed => FROM_CONFIRMED,
            Rescheduled => FROM_RESCHEDULED,
            Attended | NoShow | Cancelled => TERMINAL,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
