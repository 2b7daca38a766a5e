//! Status change history.
//!
//! Appointments are never deleted, so their past statuses are kept as an
//! append-only log. Recording returns a new history value and leaves the
//! original untouched.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single status change.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use clinic_appointments::core::{AppointmentStatus, StateTransition};
///
/// let change = StateTransition {
///     from: AppointmentStatus::New,
///     to: AppointmentStatus::Scheduled,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(change.to, AppointmentStatus::Scheduled);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The status being left
    pub from: S,
    /// The status being entered
    pub to: S,
    /// When the change was written
    pub timestamp: DateTime<Utc>,
}

/// Ordered, immutable history of status changes.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use clinic_appointments::core::{AppointmentStatus, StateHistory, StateTransition};
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: AppointmentStatus::New,
///         to: AppointmentStatus::Scheduled,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: AppointmentStatus::Scheduled,
///         to: AppointmentStatus::Confirmed,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // NEW -> SCHEDULED -> CONFIRMED
/// assert_eq!(history.current(), Some(&AppointmentStatus::Confirmed));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a change, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first `from`, then the `to` of each change.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Status after the most recent change, if any change was recorded.
    pub fn current(&self) -> Option<&S> {
        self.transitions.last().map(|t| &t.to)
    }

    /// Timestamp of the most recent change.
    pub fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        self.transitions.last().map(|t| t.timestamp)
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::AppointmentStatus::{self, *};
    use chrono::{Duration, TimeZone};

    fn change(from: AppointmentStatus, to: AppointmentStatus, minute: u32) -> StateTransition<AppointmentStatus> {
        StateTransition {
            from,
            to,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<AppointmentStatus> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.current().is_none());
        assert!(history.last_changed_at().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(change(New, Scheduled, 0));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn get_path_returns_status_sequence() {
        let history = StateHistory::new()
            .record(change(New, Scheduled, 0))
            .record(change(Scheduled, Rescheduled, 5))
            .record(change(Rescheduled, Scheduled, 10));

        let path = history.get_path();
        assert_eq!(path, vec![&New, &Scheduled, &Rescheduled, &Scheduled]);
        assert_eq!(history.current(), Some(&Scheduled));
    }

    #[test]
    fn last_changed_at_tracks_latest_record() {
        let first = change(New, Scheduled, 0);
        let second = change(Scheduled, Confirmed, 30);
        let history = StateHistory::new().record(first.clone()).record(second);

        assert_eq!(
            history.last_changed_at(),
            Some(first.timestamp + Duration::minutes(30))
        );
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(change(New, Cancelled, 0));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<AppointmentStatus> = serde_json::from_str(&json).unwrap();

        assert_eq!(history, deserialized);
    }
}
