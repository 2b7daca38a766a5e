//! Opening-hours rules for proposed slots using Validation.

use crate::config::ClinicHours;
use crate::enforcement::context::SlotContext;
use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use chrono::Weekday;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for slot check functions
pub type SlotCheck =
    Box<dyn Fn(&SlotContext) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync>;

/// Rules a slot must satisfy before the shell writes it.
/// Uses Validation to accumulate ALL violations.
pub struct ClinicRules {
    pub(crate) hours: ClinicHours,
    pub(crate) required_checks: Vec<SlotCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl ClinicRules {
    /// Enforce all rules, accumulating ALL violations.
    pub fn enforce(&self, context: &SlotContext) -> Validation<(), NonEmptyVec<ViolationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ViolationError>>> = Vec::new();

        checks.push(self.check_opening_hours(context));

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every violation for `context`, empty when the slot is acceptable.
    pub fn violations(&self, context: &SlotContext) -> Vec<ViolationError> {
        match self.enforce(context) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }

    pub fn hours(&self) -> &ClinicHours {
        &self.hours
    }

    // Open Sundays follow Saturday hours.
    fn check_opening_hours(&self, context: &SlotContext) -> Validation<(), NonEmptyVec<ViolationError>> {
        let close = match context.weekday() {
            Weekday::Sun if !self.hours.open_sundays => {
                return Validation::fail(ViolationError::ClosedOnSunday { date: context.date });
            }
            Weekday::Sat | Weekday::Sun => self.hours.saturday_close,
            _ => self.hours.weekday_close,
        };

        if context.time < close {
            return Validation::success(());
        }

        let requested = context.time;
        match context.weekday() {
            Weekday::Sat | Weekday::Sun => {
                Validation::fail(ViolationError::AfterSaturdayClose { close, requested })
            }
            _ => Validation::fail(ViolationError::AfterWeekdayClose { close, requested }),
        }
    }
}
