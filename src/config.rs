//! Runtime configuration.
//!
//! Resolved once at startup and handed to the environment, so request
//! handling never reads process-wide variables.

use crate::core::ClockTime;
use crate::enforcement::{ClinicRules, ClinicRulesBuilder, ViolationStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_HOURS_POLICY: &str = "CLINIC_HOURS_POLICY";
pub const ENV_WEEKDAY_CLOSE: &str = "CLINIC_WEEKDAY_CLOSE";
pub const ENV_SATURDAY_CLOSE: &str = "CLINIC_SATURDAY_CLOSE";
pub const ENV_OPEN_SUNDAYS: &str = "CLINIC_OPEN_SUNDAYS";
pub const ENV_PAGE_SIZE: &str = "CLINIC_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "CLINIC_MAX_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Opening hours of the practice.
///
/// Appointments must start strictly before the closing time of their day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicHours {
    pub weekday_close: ClockTime,
    pub saturday_close: ClockTime,
    pub open_sundays: bool,
}

impl Default for ClinicHours {
    fn default() -> Self {
        Self {
            weekday_close: ClockTime::new(20, 0).unwrap_or_default(),
            saturday_close: ClockTime::new(12, 0).unwrap_or_default(),
            open_sundays: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub clinic_hours: ClinicHours,
    /// What to do when a new or rescheduled slot is outside opening hours.
    pub hours_policy: ViolationStrategy,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            clinic_hours: ClinicHours::default(),
            hours_policy: ViolationStrategy::Reject,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl ScheduleConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read `CLINIC_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HOURS_POLICY) {
            config.hours_policy = value
                .parse::<ViolationStrategy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_HOURS_POLICY,
                    value,
                    reason,
                })?;
        }
        if let Some(value) = lookup(ENV_WEEKDAY_CLOSE) {
            config.clinic_hours.weekday_close = parse_clock(ENV_WEEKDAY_CLOSE, value)?;
        }
        if let Some(value) = lookup(ENV_SATURDAY_CLOSE) {
            config.clinic_hours.saturday_close = parse_clock(ENV_SATURDAY_CLOSE, value)?;
        }
        if let Some(value) = lookup(ENV_OPEN_SUNDAYS) {
            config.clinic_hours.open_sundays = parse_flag(ENV_OPEN_SUNDAYS, value)?;
        }
        if let Some(value) = lookup(ENV_PAGE_SIZE) {
            config.default_page_size = parse_page_size(ENV_PAGE_SIZE, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_PAGE_SIZE) {
            config.max_page_size = parse_page_size(ENV_MAX_PAGE_SIZE, value)?;
        }

        Ok(config)
    }

    /// Opening-hours rules for this configuration.
    pub fn rules(&self) -> ClinicRules {
        ClinicRulesBuilder::new()
            .hours(self.clinic_hours.clone())
            .on_violation(self.hours_policy)
            .build()
    }

    /// Clamp a requested page and page size to the configured limits.
    ///
    /// Pages start at 1. A size of zero or above the maximum falls back to
    /// the default.
    pub fn page_bounds(&self, page: u32, per_page: u32) -> (u32, u32) {
        let page = page.max(1);
        let per_page = if per_page == 0 || per_page > self.max_page_size {
            self.default_page_size
        } else {
            per_page
        };
        (page, per_page)
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_clock(key: &'static str, value: String) -> Result<ClockTime, ConfigError> {
    ClockTime::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
        key,
        value,
        reason: "expected HH:MM".to_string(),
    })
}

fn parse_page_size(key: &'static str, value: String) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        Ok(_) => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "must be greater than zero".to_string(),
        }),
        Err(err) => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: err.to_string(),
        }),
    }
}
