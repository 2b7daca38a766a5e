//! Errors raised by stores and service operations.

use crate::builder::BuildError;
use crate::core::{PackageStatus, TransitionError};
use crate::enforcement::ViolationError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when reading or writing records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: Uuid },

    #[error("appointment {id} changed concurrently (expected version {expected}, found {found})")]
    VersionConflict { id: Uuid, expected: u64, found: u64 },

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the service effects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("patient {0} not found")]
    PatientNotFound(Uuid),

    #[error("treatment package {0} not found")]
    PackageNotFound(Uuid),

    #[error("treatment package {id} is not active ({status:?})")]
    PackageNotActive { id: Uuid, status: PackageStatus },

    #[error("treatment package {package_id} does not belong to patient {patient_id}")]
    PackageOwnerMismatch { package_id: Uuid, patient_id: Uuid },

    #[error("outside clinic hours: {}", list(.violations))]
    OutsideClinicHours { violations: Vec<ViolationError> },
}

impl ServiceError {
    /// Another write won the race; re-read and decide again.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::VersionConflict { .. }))
    }
}

fn list(violations: &[ViolationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
