//! In-memory clinic environment.

use crate::config::ScheduleConfig;
use crate::core::{
    Appointment, AppointmentStatus, StateHistory, StateTransition, StatusPatch, TreatmentPackage,
};
use crate::effects::error::StoreError;
use crate::effects::service::ClinicEnv;
use crate::effects::store::{
    select_page, AppointmentFilter, AppointmentStore, Page, PackageStore, PatientDirectory,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct Records {
    appointments: HashMap<Uuid, Appointment>,
    histories: HashMap<Uuid, StateHistory<AppointmentStatus>>,
}

/// Shared, lock-guarded storage for appointments, packages and known patients.
///
/// Clones share the same records. A record and its history are always
/// written under one lock, so a reader never sees one without the other.
#[derive(Clone)]
pub struct InMemoryClinic {
    records: Arc<RwLock<Records>>,
    packages: Arc<RwLock<HashMap<Uuid, TreatmentPackage>>>,
    patients: Arc<RwLock<HashSet<Uuid>>>,
    config: Arc<ScheduleConfig>,
    clock: Option<DateTime<Utc>>,
}

impl InMemoryClinic {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::default())),
            packages: Arc::new(RwLock::new(HashMap::new())),
            patients: Arc::new(RwLock::new(HashSet::new())),
            config: Arc::new(config),
            clock: None,
        }
    }

    /// Freeze the clock at `now`.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    /// Make `id` known to the patient directory. Registering twice is fine.
    pub fn register_patient(&self, id: Uuid) -> Result<Uuid, StoreError> {
        let mut patients = self.patients.write().map_err(|_| StoreError::Poisoned)?;
        patients.insert(id);
        Ok(id)
    }
}

impl Default for InMemoryClinic {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

impl ClinicEnv for InMemoryClinic {
    fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }
}

impl AppointmentStore for InMemoryClinic {
    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if records.appointments.contains_key(&appointment.id) {
            return Err(StoreError::AlreadyExists {
                kind: "appointment",
                id: appointment.id,
            });
        }
        records.histories.insert(appointment.id, StateHistory::new());
        records
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "appointment",
                id,
            })
    }

    fn update_appointment(
        &self,
        id: Uuid,
        expected_version: u64,
        patch: &StatusPatch,
    ) -> Result<Appointment, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let current = records.appointments.get(&id).ok_or(StoreError::NotFound {
            kind: "appointment",
            id,
        })?;

        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
                found: current.version,
            });
        }

        let mut next = current.apply(patch);
        next.version = current.version + 1;
        let change = StateTransition {
            from: current.status,
            to: next.status,
            timestamp: patch.updated_at,
        };

        let history = records
            .histories
            .get(&id)
            .map(|h| h.record(change.clone()))
            .unwrap_or_else(|| StateHistory::new().record(change));
        records.histories.insert(id, history);
        records.appointments.insert(id, next.clone());
        Ok(next)
    }

    fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Page<Appointment>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(select_page(records.appointments.values(), filter))
    }

    fn appointment_history(
        &self,
        id: Uuid,
    ) -> Result<StateHistory<AppointmentStatus>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records
            .histories
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "appointment",
                id,
            })
    }
}

impl PackageStore for InMemoryClinic {
    fn insert_package(&self, package: TreatmentPackage) -> Result<TreatmentPackage, StoreError> {
        let mut packages = self.packages.write().map_err(|_| StoreError::Poisoned)?;
        if packages.contains_key(&package.id) {
            return Err(StoreError::AlreadyExists {
                kind: "package",
                id: package.id,
            });
        }
        packages.insert(package.id, package.clone());
        Ok(package)
    }

    fn get_package(&self, id: Uuid) -> Result<TreatmentPackage, StoreError> {
        let packages = self.packages.read().map_err(|_| StoreError::Poisoned)?;
        packages
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "package", id })
    }

    fn record_session(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TreatmentPackage, StoreError> {
        let mut packages = self.packages.write().map_err(|_| StoreError::Poisoned)?;
        let package = packages
            .get(&id)
            .ok_or(StoreError::NotFound { kind: "package", id })?
            .record_session(now);
        packages.insert(id, package.clone());
        Ok(package)
    }
}

impl PatientDirectory for InMemoryClinic {
    fn patient_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let patients = self.patients.read().map_err(|_| StoreError::Poisoned)?;
        Ok(patients.contains(&id))
    }
}
