//! Storage seams for appointments and treatment packages.

use crate::core::{
    Appointment, AppointmentStatus, Shift, StateHistory, StatusPatch, TreatmentPackage,
};
use crate::effects::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use uuid::Uuid;

pub trait AppointmentStore {
    /// Store a new appointment. Fails if the id is taken.
    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError>;

    /// Merge `patch` only if the stored version still equals
    /// `expected_version`, bumping the version and recording the status
    /// change in the appointment's history in the same write.
    fn update_appointment(
        &self,
        id: Uuid,
        expected_version: u64,
        patch: &StatusPatch,
    ) -> Result<Appointment, StoreError>;

    fn list_appointments(&self, filter: &AppointmentFilter)
        -> Result<Page<Appointment>, StoreError>;

    fn appointment_history(&self, id: Uuid)
        -> Result<StateHistory<AppointmentStatus>, StoreError>;
}

pub trait PackageStore {
    fn insert_package(&self, package: TreatmentPackage) -> Result<TreatmentPackage, StoreError>;

    fn get_package(&self, id: Uuid) -> Result<TreatmentPackage, StoreError>;

    /// Count one attended session against the package.
    fn record_session(&self, id: Uuid, now: DateTime<Utc>)
        -> Result<TreatmentPackage, StoreError>;
}

/// Read-only view of the patient register, which this crate does not own.
pub trait PatientDirectory {
    fn patient_exists(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Listing criteria. Unset fields match everything.
///
/// `page` starts at 1; a `per_page` of zero means the configured default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for AppointmentFilter {
    fn default() -> Self {
        Self {
            date: None,
            shift: None,
            status: None,
            patient_id: None,
            page: 1,
            per_page: 0,
        }
    }
}

impl AppointmentFilter {
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn in_shift(mut self, shift: Shift) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn for_patient(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.date.map_or(true, |d| appointment.date == d)
            && self.shift.map_or(true, |s| appointment.shift == s)
            && self.status.map_or(true, |s| appointment.status == s)
            && self.patient_id.map_or(true, |p| appointment.patient_id == p)
    }
}

/// One page of results plus the totals needed to page through the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Cut page `page` (1-based) out of an already ordered result set.
    pub fn slice(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();
        let total_pages = page_count(total, per_page);
        let skip = (page as usize - 1).saturating_mul(per_page as usize);

        Self {
            items: all.into_iter().skip(skip).take(per_page as usize).collect(),
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Number of pages needed for `total` items, saturating at `u32::MAX`.
fn page_count(total: usize, per_page: u32) -> u32 {
    let pages = total.div_ceil(per_page.max(1) as usize);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Filter and order appointments newest slot first, then paginate.
pub fn select_page<'a, I>(appointments: I, filter: &AppointmentFilter) -> Page<Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let mut matching: Vec<Appointment> = appointments
        .into_iter()
        .filter(|a| filter.matches(a))
        .cloned()
        .collect();
    matching.sort_by_key(|a| (Reverse(a.date), Reverse(a.time), a.id));
    Page::slice(matching, filter.page, filter.per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slice_reports_totals() {
        let page = Page::slice((1..=7).collect::<Vec<_>>(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);

        let past_end = Page::slice((1..=7).collect::<Vec<_>>(), 9, 3);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 7);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<u8> = Page::slice(Vec::new(), 1, 20);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_count_saturates_instead_of_wrapping() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(41, 20), 3);
        assert_eq!(page_count(usize::MAX, 1), u32::MAX);
    }

    #[test]
    fn filter_deserializes_with_defaults() {
        let filter: AppointmentFilter =
            serde_json::from_str(r#"{"status": "CONFIRMED", "shift": "PM"}"#).unwrap();
        assert_eq!(filter.status, Some(AppointmentStatus::Confirmed));
        assert_eq!(filter.shift, Some(Shift::Afternoon));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, 0);
    }
}
