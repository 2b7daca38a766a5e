//! Appointment operations as Stillwater effects.
//!
//! Each operation reads through the environment, asks the pure core for a
//! decision, and writes the result back. The environment supplies storage,
//! configuration and the clock, so the same effect runs against the
//! in-memory clinic in tests and a real backend in production.

use crate::builder::NewAppointment;
use crate::config::ScheduleConfig;
use crate::core::{
    apply_transition, Appointment, AppointmentStatus, ReschedulePayload, Shift, Slot,
    StateHistory,
};
use crate::effects::error::{ServiceError, StoreError};
use crate::effects::store::{
    AppointmentFilter, AppointmentStore, Page, PackageStore, PatientDirectory,
};
use crate::enforcement::{ClinicRules, SlotContext, ViolationStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything the service effects need from the outside world.
pub trait ClinicEnv:
    AppointmentStore + PackageStore + PatientDirectory + Clone + Send + Sync + 'static
{
    fn config(&self) -> &ScheduleConfig;

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Rules applied to new and rescheduled slots.
    fn rules(&self) -> ClinicRules {
        self.config().rules()
    }
}

/// A requested status change, as received from a caller.
///
/// The reschedule fields sit next to `status` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: AppointmentStatus,
    #[serde(flatten)]
    pub payload: ReschedulePayload,
}

impl StatusChangeRequest {
    pub fn to(status: AppointmentStatus) -> Self {
        Self {
            status,
            payload: ReschedulePayload::default(),
        }
    }

    pub fn reschedule(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            status: AppointmentStatus::Rescheduled,
            payload: ReschedulePayload::new(date, time),
        }
    }

    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.payload.shift = Some(shift);
        self
    }
}

/// Store a new appointment in `NEW`.
///
/// The patient must be registered. A referenced package must exist, belong
/// to the patient and be active.
pub fn create_appointment<Env: ClinicEnv>(
    new: NewAppointment,
) -> impl Effect<Output = Appointment, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| create_now(env, &new))
}

/// Move an appointment to `request.status`.
///
/// Fails with a version conflict if someone else changed the appointment
/// between the read and the write.
pub fn change_status<Env: ClinicEnv>(
    id: Uuid,
    request: StatusChangeRequest,
) -> impl Effect<Output = Appointment, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| change_now(env, id, &request))
}

/// Statuses the stored appointment may move to next.
pub fn legal_next<Env: ClinicEnv>(
    id: Uuid,
) -> impl Effect<Output = Vec<AppointmentStatus>, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| -> Result<_, ServiceError> {
        Ok(env.get_appointment(id)?.legal_next().to_vec())
    })
}

pub fn get_appointment<Env: ClinicEnv>(
    id: Uuid,
) -> impl Effect<Output = Appointment, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| -> Result<_, ServiceError> { Ok(env.get_appointment(id)?) })
}

pub fn history<Env: ClinicEnv>(
    id: Uuid,
) -> impl Effect<Output = StateHistory<AppointmentStatus>, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| -> Result<_, ServiceError> { Ok(env.appointment_history(id)?) })
}

/// List appointments newest slot first, clamping paging to the configured limits.
pub fn list_appointments<Env: ClinicEnv>(
    filter: AppointmentFilter,
) -> impl Effect<Output = Page<Appointment>, Error = ServiceError, Env = Env> {
    from_fn(move |env: &Env| -> Result<_, ServiceError> {
        let (page, per_page) = env.config().page_bounds(filter.page, filter.per_page);
        let bounded = filter.clone().page(page, per_page);
        Ok(env.list_appointments(&bounded)?)
    })
}

fn create_now<Env: ClinicEnv>(env: &Env, new: &NewAppointment) -> Result<Appointment, ServiceError> {
    if !env.patient_exists(new.patient_id)? {
        debug!(patient_id = %new.patient_id, "booking for unknown patient");
        return Err(ServiceError::PatientNotFound(new.patient_id));
    }
    if let Some(package_id) = new.package_id {
        check_package(env, package_id, new.patient_id)?;
    }
    check_hours(env, new.slot)?;

    let appointment = new.clone().into_appointment(Uuid::new_v4(), env.now());
    let stored = env.insert_appointment(appointment)?;

    info!(
        appointment_id = %stored.id,
        patient_id = %stored.patient_id,
        date = %stored.date,
        time = %stored.time,
        "appointment created"
    );
    Ok(stored)
}

fn change_now<Env: ClinicEnv>(
    env: &Env,
    id: Uuid,
    request: &StatusChangeRequest,
) -> Result<Appointment, ServiceError> {
    let current = env.get_appointment(id)?;

    let patch = apply_transition(current.status, request.status, Some(&request.payload), env.now())
        .map_err(|err| {
            debug!(appointment_id = %id, error = %err, "status change rejected");
            err
        })?;

    if let Some(slot) = patch.slot {
        check_hours(env, slot)?;
    }

    let updated = env
        .update_appointment(id, current.version, &patch)
        .map_err(|err| {
            if let StoreError::VersionConflict { .. } = err {
                warn!(appointment_id = %id, error = %err, "lost status change race");
            }
            err
        })?;

    info!(
        appointment_id = %id,
        from = %current.status,
        to = %updated.status,
        version = updated.version,
        "appointment status changed"
    );

    if updated.status == AppointmentStatus::Attended {
        if let Some(package_id) = updated.package_id {
            count_session(env, package_id, updated.updated_at);
        }
    }

    Ok(updated)
}

fn check_package<Env: ClinicEnv>(
    env: &Env,
    package_id: Uuid,
    patient_id: Uuid,
) -> Result<(), ServiceError> {
    let package = match env.get_package(package_id) {
        Ok(package) => package,
        Err(StoreError::NotFound { .. }) => return Err(ServiceError::PackageNotFound(package_id)),
        Err(err) => return Err(err.into()),
    };

    if package.patient_id != patient_id {
        return Err(ServiceError::PackageOwnerMismatch {
            package_id,
            patient_id,
        });
    }
    if !package.is_active() {
        return Err(ServiceError::PackageNotActive {
            id: package_id,
            status: package.status,
        });
    }
    Ok(())
}

fn check_hours<Env: ClinicEnv>(env: &Env, slot: Slot) -> Result<(), ServiceError> {
    let rules = env.rules();
    let strategy = rules.violation_strategy();
    if strategy == ViolationStrategy::Ignore {
        return Ok(());
    }

    let violations = rules.violations(&SlotContext::from(slot));
    if violations.is_empty() {
        return Ok(());
    }

    match strategy {
        ViolationStrategy::WarnOnly => {
            for violation in &violations {
                warn!(date = %slot.date, time = %slot.time, %violation, "slot outside clinic hours");
            }
            Ok(())
        }
        _ => Err(ServiceError::OutsideClinicHours { violations }),
    }
}

// The status change is already committed; a package failure must not undo it.
fn count_session<Env: ClinicEnv>(env: &Env, package_id: Uuid, now: DateTime<Utc>) {
    match env.record_session(package_id, now) {
        Ok(package) => debug!(
            package_id = %package_id,
            completed = package.completed_sessions,
            total = package.total_sessions.get(),
            status = ?package.status,
            "package session recorded"
        ),
        Err(err) => warn!(package_id = %package_id, error = %err, "could not record package session"),
    }
}
