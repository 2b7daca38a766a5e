//! Calendar slot values: date, clock time and shift.
//!
//! Times arrive in several textual encodings (bare `HH:MM`, `HH:MM:SS`, or
//! embedded in a full timestamp). All of them reduce to hour:minute here,
//! and are always written back out as `HH:MM`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const CLOCK_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%H:%M:%S%.f"];

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// ISO calendar date format used on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date. Blank input is rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Time of day at minute precision.
///
/// Seconds and sub-seconds are always zero.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse any accepted time encoding, truncating to hour:minute.
    ///
    /// ```rust
    /// use clinic_appointments::core::ClockTime;
    ///
    /// let expected = ClockTime::new(14, 30);
    /// assert_eq!(ClockTime::parse("14:30"), expected);
    /// assert_eq!(ClockTime::parse("14:30:59"), expected);
    /// assert_eq!(ClockTime::parse("2024-06-01T14:30:00Z"), expected);
    /// assert_eq!(ClockTime::parse(""), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let clock = CLOCK_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok());
        if let Some(time) = clock {
            return Some(Self::truncate(time));
        }

        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::truncate(stamp.time()));
        }

        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|stamp| Self::truncate(stamp.time()))
    }

    fn truncate(time: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self::truncate(time)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid time of day '{s}'"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Half-day grouping that routes an appointment to the practitioner on duty.
///
/// Independent of the clock time: an afternoon shift at a morning hour is
/// unusual but allowed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    #[default]
    #[serde(alias = "AM")]
    Morning,
    #[serde(alias = "PM")]
    Afternoon,
}

impl Shift {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Morning => "MORNING",
            Self::Afternoon => "AFTERNOON",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MORNING" | "AM" => Ok(Self::Morning),
            "AFTERNOON" | "PM" => Ok(Self::Afternoon),
            other => Err(format!("unknown shift '{other}'")),
        }
    }
}

/// Date, time and shift, which only ever change together.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: ClockTime,
    pub shift: Shift,
}
