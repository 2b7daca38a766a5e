//! Violation errors and handling strategies.

use crate::core::ClockTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a proposed slot falls outside the practice's rules
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationError {
    #[error("the clinic is closed on Sundays ({date})")]
    ClosedOnSunday { date: NaiveDate },

    #[error("Saturday appointments must start before {close} (requested {requested})")]
    AfterSaturdayClose {
        close: ClockTime,
        requested: ClockTime,
    },

    #[error("weekday appointments must start before {close} (requested {requested})")]
    AfterWeekdayClose {
        close: ClockTime,
        requested: ClockTime,
    },

    #[error("custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What the shell does when a slot breaks the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStrategy {
    /// Refuse the write and report every violation
    #[default]
    Reject,

    /// Log the violations and write anyway
    WarnOnly,

    /// Do not evaluate the rules
    Ignore,
}

impl std::str::FromStr for ViolationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "warn" | "warn_only" => Ok(Self::WarnOnly),
            "ignore" | "off" => Ok(Self::Ignore),
            other => Err(format!("unknown violation strategy '{other}'")),
        }
    }
}
