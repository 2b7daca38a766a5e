//! Transition error types.

use super::status::AppointmentStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reschedule input field, used for field-level error messages.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescheduleField {
    Date,
    Time,
}

impl RescheduleField {
    /// Format hint shown next to the field.
    pub fn expected_format(&self) -> &'static str {
        match self {
            Self::Date => "YYYY-MM-DD",
            Self::Time => "HH:MM",
        }
    }
}

impl fmt::Display for RescheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// A reschedule field whose value could not be parsed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InvalidField {
    pub field: RescheduleField,
    pub value: String,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (expected {})",
            self.field,
            self.value,
            self.field.expected_format()
        )
    }
}

/// Errors returned by the appointment state machine.
///
/// Every variant is recoverable: the caller shows it to the user and waits
/// for new input. Nothing is retried automatically.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move appointment from {from} to {to} (allowed: {})", join(.allowed))]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
        allowed: Vec<AppointmentStatus>,
    },

    #[error("rescheduling requires {}", join(.fields))]
    MissingRescheduleFields { fields: Vec<RescheduleField> },

    #[error("invalid reschedule input: {}", join(.fields))]
    InvalidDateOrTime { fields: Vec<InvalidField> },
}

impl TransitionError {
    /// Statuses the caller may offer instead, for `InvalidTransition`.
    pub fn alternatives(&self) -> &[AppointmentStatus] {
        match self {
            Self::InvalidTransition { allowed, .. } => allowed,
            _ => &[],
        }
    }
}

/// Status name that matches none of the known statuses.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown appointment status '{0}'")]
pub struct UnknownStatus(pub String);

fn join<T: fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
