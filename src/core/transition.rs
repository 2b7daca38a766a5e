//! The appointment state machine.
//!
//! [`apply_transition`] is a pure decision function: it validates a
//! requested status change against the static table and assembles the patch
//! to persist. Reading the stored status and writing the patch back are the
//! caller's job (see `crate::effects`).

use super::error::{InvalidField, RescheduleField, TransitionError};
use super::slot::{parse_date, ClockTime, Shift, Slot};
use super::state::State;
use super::status::AppointmentStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw reschedule input, as collected from the user.
///
/// Only consulted when the requested status is `RESCHEDULED`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReschedulePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
}

impl ReschedulePayload {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            time: Some(time.into()),
            shift: None,
        }
    }

    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shift = Some(shift);
        self
    }
}

/// Fields to merge into a stored appointment after a successful transition.
///
/// `slot` is present if and only if the target status is `RESCHEDULED`.
/// Deserialization enforces this: a reschedule without a complete slot, a
/// partial slot, or a slot on any other status is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPatch")]
pub struct StatusPatch {
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub slot: Option<Slot>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawPatch {
    status: AppointmentStatus,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    time: Option<ClockTime>,
    #[serde(default)]
    shift: Option<Shift>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawPatch> for StatusPatch {
    type Error = String;

    fn try_from(raw: RawPatch) -> Result<Self, Self::Error> {
        let slot = match (raw.date, raw.time, raw.shift) {
            (Some(date), Some(time), Some(shift)) => Some(Slot { date, time, shift }),
            (None, None, None) => None,
            _ => return Err("date, time and shift must be given together".to_string()),
        };

        match (raw.status, slot) {
            (AppointmentStatus::Rescheduled, None) => {
                Err("a RESCHEDULED patch requires date, time and shift".to_string())
            }
            (status, Some(_)) if status != AppointmentStatus::Rescheduled => {
                Err(format!("a {status} patch cannot carry a slot"))
            }
            (status, slot) => Ok(Self {
                status,
                slot,
                updated_at: raw.updated_at,
            }),
        }
    }
}

/// Legal next statuses for `current`, straight from the table.
pub fn legal_next(current: AppointmentStatus) -> &'static [AppointmentStatus] {
    current.successors()
}

/// Validate a status change and build the patch to persist.
///
/// `current` must be the persisted status at the time of the call. `now`
/// becomes the patch's update timestamp, so identical arguments always
/// produce identical patches.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use clinic_appointments::core::{apply_transition, AppointmentStatus, ReschedulePayload, Shift};
///
/// let now = Utc::now();
/// let payload = ReschedulePayload::new("2024-06-01", "14:30");
/// let patch = apply_transition(
///     AppointmentStatus::Scheduled,
///     AppointmentStatus::Rescheduled,
///     Some(&payload),
///     now,
/// )
/// .unwrap();
///
/// let slot = patch.slot.unwrap();
/// assert_eq!(slot.time.to_string(), "14:30");
/// assert_eq!(slot.shift, Shift::Morning);
/// ```
pub fn apply_transition(
    current: AppointmentStatus,
    requested: AppointmentStatus,
    payload: Option<&ReschedulePayload>,
    now: DateTime<Utc>,
) -> Result<StatusPatch, TransitionError> {
    if !current.can_transition_to(&requested) {
        return Err(TransitionError::InvalidTransition {
            from: current,
            to: requested,
            allowed: current.successors().to_vec(),
        });
    }

    // State-only transitions ignore any payload.
    let slot = match requested {
        AppointmentStatus::Rescheduled => Some(resolve_slot(payload)?),
        _ => None,
    };

    Ok(StatusPatch {
        status: requested,
        slot,
        updated_at: now,
    })
}

/// Turn raw reschedule input into a slot.
///
/// Missing fields are reported before malformed ones, and each check lists
/// every offending field at once.
pub fn resolve_slot(payload: Option<&ReschedulePayload>) -> Result<Slot, TransitionError> {
    let fallback = ReschedulePayload::default();
    let payload = payload.unwrap_or(&fallback);

    let raw_date = non_blank(payload.date.as_deref());
    let raw_time = non_blank(payload.time.as_deref());

    let (raw_date, raw_time) = match (raw_date, raw_time) {
        (Some(date), Some(time)) => (date, time),
        (date, time) => {
            let mut fields = Vec::with_capacity(2);
            if date.is_none() {
                fields.push(RescheduleField::Date);
            }
            if time.is_none() {
                fields.push(RescheduleField::Time);
            }
            return Err(TransitionError::MissingRescheduleFields { fields });
        }
    };

    match (parse_date(raw_date), ClockTime::parse(raw_time)) {
        (Some(date), Some(time)) => Ok(Slot {
            date,
            time,
            shift: payload.shift.unwrap_or_default(),
        }),
        (date, time) => {
            let mut fields = Vec::with_capacity(2);
            if date.is_none() {
                fields.push(InvalidField {
                    field: RescheduleField::Date,
                    value: raw_date.to_string(),
                });
            }
            if time.is_none() {
                fields.push(InvalidField {
                    field: RescheduleField::Time,
                    value: raw_time.to_string(),
                });
            }
            Err(TransitionError::InvalidDateOrTime { fields })
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use AppointmentStatus::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_to_scheduled_is_state_only() {
        let patch = apply_transition(New, Scheduled, None, now()).unwrap();
        assert_eq!(
            patch,
            StatusPatch {
                status: Scheduled,
                slot: None,
                updated_at: now(),
            }
        );
    }

    #[test]
    fn reschedule_defaults_shift_to_morning() {
        let payload = ReschedulePayload::new("2024-06-01", "14:30");
        let patch = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap();

        assert_eq!(patch.status, Rescheduled);
        assert_eq!(
            patch.slot,
            Some(Slot {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                time: ClockTime::new(14, 30).unwrap(),
                shift: Shift::Morning,
            })
        );
    }

    #[test]
    fn reschedule_keeps_requested_shift() {
        let payload = ReschedulePayload::new("2024-06-03", "09:15").with_shift(Shift::Afternoon);
        let patch = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap();
        assert_eq!(patch.slot.unwrap().shift, Shift::Afternoon);
    }

    #[test]
    fn reschedule_without_payload_reports_both_fields() {
        let err = apply_transition(Scheduled, Rescheduled, None, now()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingRescheduleFields {
                fields: vec![RescheduleField::Date, RescheduleField::Time],
            }
        );

        let empty = ReschedulePayload::default();
        let err = apply_transition(Scheduled, Rescheduled, Some(&empty), now()).unwrap_err();
        assert!(matches!(err, TransitionError::MissingRescheduleFields { .. }));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let payload = ReschedulePayload::new("2024-06-01", "   ");
        let err = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::MissingRescheduleFields {
                fields: vec![RescheduleField::Time],
            }
        );
    }

    #[test]
    fn missing_is_reported_before_malformed() {
        let payload = ReschedulePayload {
            date: Some("not-a-date".to_string()),
            time: None,
            shift: None,
        };
        let err = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap_err();
        assert!(matches!(err, TransitionError::MissingRescheduleFields { .. }));
    }

    #[test]
    fn malformed_values_are_listed_with_raw_input() {
        let payload = ReschedulePayload::new("2024-13-01", "9 o'clock");
        let err = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidDateOrTime {
                fields: vec![
                    InvalidField {
                        field: RescheduleField::Date,
                        value: "2024-13-01".to_string(),
                    },
                    InvalidField {
                        field: RescheduleField::Time,
                        value: "9 o'clock".to_string(),
                    },
                ],
            }
        );
    }

    #[test]
    fn payload_is_ignored_for_state_only_transitions() {
        let payload = ReschedulePayload::new("garbage", "garbage");
        let patch = apply_transition(Scheduled, Confirmed, Some(&payload), now()).unwrap();
        assert_eq!(patch.slot, None);
    }

    #[test]
    fn confirmed_to_new_reports_alternatives() {
        let err = apply_transition(Confirmed, New, None, now()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: Confirmed,
                to: New,
                allowed: vec![Attended, NoShow, Cancelled],
            }
        );
    }

    #[test]
    fn terminal_states_reject_everything() {
        for current in [Attended, NoShow, Cancelled] {
            for requested in AppointmentStatus::ALL {
                let err = apply_transition(current, requested, None, now()).unwrap_err();
                assert!(matches!(err, TransitionError::InvalidTransition { .. }));
                assert!(err.alternatives().is_empty());
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in AppointmentStatus::ALL {
            assert!(apply_transition(status, status, None, now()).is_err());
        }
    }

    #[test]
    fn invalid_transition_wins_over_payload_checks() {
        let err = apply_transition(New, Rescheduled, None, now()).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    }

    #[test]
    fn identical_arguments_give_identical_patches() {
        let payload = ReschedulePayload::new("2024-06-01", "14:30:59");
        let first = apply_transition(Scheduled, Rescheduled, Some(&payload), now());
        let second = apply_transition(Scheduled, Rescheduled, Some(&payload), now());
        assert_eq!(first, second);
    }

    #[test]
    fn legal_next_is_the_table_row() {
        assert_eq!(legal_next(Scheduled), &[Confirmed, Cancelled, Rescheduled]);
        assert!(legal_next(NoShow).is_empty());
    }

    #[test]
    fn patch_serializes_flat() {
        let payload = ReschedulePayload::new("2024-06-01", "14:30");
        let patch = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["status"], "RESCHEDULED");
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["time"], "14:30");
        assert_eq!(json["shift"], "MORNING");

        let state_only = apply_transition(New, Scheduled, None, now()).unwrap();
        let json = serde_json::to_value(&state_only).unwrap();
        assert!(json.get("date").is_none());
    }

    #[test]
    fn patch_reads_back_from_json() {
        let payload = ReschedulePayload::new("2024-06-01", "14:30").with_shift(Shift::Afternoon);
        let patch = apply_transition(Scheduled, Rescheduled, Some(&payload), now()).unwrap();
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(serde_json::from_str::<StatusPatch>(&json).unwrap(), patch);

        let state_only = apply_transition(Confirmed, Attended, None, now()).unwrap();
        let json = serde_json::to_string(&state_only).unwrap();
        assert_eq!(serde_json::from_str::<StatusPatch>(&json).unwrap(), state_only);
    }

    #[test]
    fn patch_with_malformed_slot_is_rejected() {
        let corrupted = r#"{"status":"RESCHEDULED","date":"2024-06-01","time":"nope","shift":"MORNING","updated_at":"2024-05-20T09:00:00Z"}"#;
        assert!(serde_json::from_str::<StatusPatch>(corrupted).is_err());
    }

    #[test]
    fn reschedule_patch_without_slot_is_rejected() {
        let bare = r#"{"status":"RESCHEDULED","updated_at":"2024-05-20T09:00:00Z"}"#;
        let err = serde_json::from_str::<StatusPatch>(bare).unwrap_err();
        assert!(err.to_string().contains("requires date, time and shift"));
    }

    #[test]
    fn patch_with_partial_slot_is_rejected() {
        let partial = r#"{"status":"RESCHEDULED","date":"2024-06-01","time":"14:30","updated_at":"2024-05-20T09:00:00Z"}"#;
        let err = serde_json::from_str::<StatusPatch>(partial).unwrap_err();
        assert!(err.to_string().contains("must be given together"));
    }

    #[test]
    fn slot_on_state_only_patch_is_rejected() {
        let stray = r#"{"status":"CONFIRMED","date":"2024-06-01","time":"14:30","shift":"MORNING","updated_at":"2024-05-20T09:00:00Z"}"#;
        let err = serde_json::from_str::<StatusPatch>(stray).unwrap_err();
        assert!(err.to_string().contains("cannot carry a slot"));
    }
}
