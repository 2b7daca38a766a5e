//! Validation-based clinic rules for proposed appointment slots.
//!
//! The shell runs these rules when an appointment is created or rescheduled.
//! They use Stillwater's `Validation` type so that every violation is
//! reported at once instead of stopping at the first one. The pure
//! `apply_transition` never consults them.
//!
//! # Example
//!
//! ```rust
//! use clinic_appointments::core::{ClockTime, Shift};
//! use clinic_appointments::enforcement::{ClinicRulesBuilder, SlotContext, ViolationStrategy};
//! use chrono::NaiveDate;
//!
//! let rules = ClinicRulesBuilder::new()
//!     .saturday_close(ClockTime::new(13, 0).unwrap())
//!     .on_violation(ViolationStrategy::Reject)
//!     .build();
//!
//! let saturday_morning = SlotContext {
//!     date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     time: ClockTime::new(12, 30).unwrap(),
//!     shift: Shift::Morning,
//! };
//! assert!(rules.violations(&saturday_morning).is_empty());
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::ClinicRulesBuilder;
pub use context::SlotContext;
pub use rules::{ClinicRules, SlotCheck};
pub use violations::{ViolationError, ViolationStrategy};
