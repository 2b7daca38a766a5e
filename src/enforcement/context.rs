//! Context provided to slot checks.

use crate::core::{ClockTime, Shift, Slot};
use chrono::{Datelike, NaiveDate, Weekday};

/// A proposed appointment slot under evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotContext {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub shift: Shift,
}

impl SlotContext {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

impl From<Slot> for SlotContext {
    fn from(slot: Slot) -> Self {
        Self {
            date: slot.date,
            time: slot.time,
            shift: slot.shift,
        }
    }
}
