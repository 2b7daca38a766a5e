//! Treatment packages: bundles of prepaid sessions.
//!
//! Appointments reference a package but never change it themselves. The
//! service records a session when an appointment is attended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPackage {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub treatment_type: String,
    pub total_sessions: NonZeroU32,
    pub completed_sessions: u32,
    pub status: PackageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreatmentPackage {
    pub fn new(
        patient_id: Uuid,
        treatment_type: impl Into<String>,
        total_sessions: NonZeroU32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            treatment_type: treatment_type.into(),
            total_sessions,
            completed_sessions: 0,
            status: PackageStatus::Active,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PackageStatus::Active
    }

    pub fn remaining_sessions(&self) -> u32 {
        self.total_sessions
            .get()
            .saturating_sub(self.completed_sessions)
    }

    /// Count one attended session, completing the package at its total.
    ///
    /// Inactive packages are returned unchanged.
    pub fn record_session(&self, now: DateTime<Utc>) -> Self {
        if !self.is_active() {
            return self.clone();
        }
        let mut next = self.clone();
        next.completed_sessions += 1;
        next.updated_at = now;
        if next.completed_sessions >= next.total_sessions.get() {
            next.status = PackageStatus::Completed;
        }
        next
    }
}
