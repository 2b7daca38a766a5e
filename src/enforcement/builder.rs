//! Builder API for creating clinic rules.

use crate::config::ClinicHours;
use crate::core::ClockTime;
use crate::enforcement::context::SlotContext;
use crate::enforcement::rules::{ClinicRules, SlotCheck};
use crate::enforcement::violations::{ViolationError, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating clinic rules
pub struct ClinicRulesBuilder {
    hours: ClinicHours,
    required_checks: Vec<SlotCheck>,
    on_violation: ViolationStrategy,
}

impl ClinicRulesBuilder {
    pub fn new() -> Self {
        Self {
            hours: ClinicHours::default(),
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Reject,
        }
    }

    /// Replace the opening hours wholesale
    pub fn hours(mut self, hours: ClinicHours) -> Self {
        self.hours = hours;
        self
    }

    pub fn weekday_close(mut self, close: ClockTime) -> Self {
        self.hours.weekday_close = close;
        self
    }

    pub fn saturday_close(mut self, close: ClockTime) -> Self {
        self.hours.saturday_close = close;
        self
    }

    pub fn open_sundays(mut self, open: bool) -> Self {
        self.hours.open_sundays = open;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&SlotContext) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&SlotContext) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &SlotContext| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    pub fn build(self) -> ClinicRules {
        ClinicRules {
            hours: self.hours,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}

impl Default for ClinicRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
