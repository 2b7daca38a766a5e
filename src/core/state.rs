//! Core State trait for lifecycle states.
//!
//! A state knows its own display name and the fixed set of states it may
//! move to next. The transition graph is therefore owned by the state type
//! itself, and every query against it is pure.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for lifecycle states backed by a static transition table.
///
/// # Required Traits
///
/// - `Copy`: states are small enum values passed around by value
/// - `PartialEq`: states must be comparable for table lookups
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states are exchanged with storage and HTTP
///
/// # Example
///
/// ```rust
/// use clinic_appointments::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
/// enum Ticket {
///     Open,
///     Closed,
/// }
///
/// impl State for Ticket {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Open => "OPEN",
///             Self::Closed => "CLOSED",
///         }
///     }
///
///     fn successors(&self) -> &'static [Self] {
///         match self {
///             Self::Open => &[Self::Closed],
///             Self::Closed => &[],
///         }
///     }
/// }
///
/// assert!(Ticket::Open.can_transition_to(&Ticket::Closed));
/// assert!(!Ticket::Closed.can_transition_to(&Ticket::Open));
/// assert!(Ticket::Closed.is_final());
/// ```
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Wire name of the state, as stored and displayed.
    fn name(&self) -> &'static str;

    /// States reachable from this one in a single step.
    ///
    /// The slice is the table row for this state and must never contain
    /// the state itself.
    fn successors(&self) -> &'static [Self];

    /// Check whether `target` is one of this state's successors.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// A final (absorbing) state has no successors.
    fn is_final(&self) -> bool {
        self.successors().is_empty()
    }
}
