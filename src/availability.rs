use crate::{
    backend::StorageBackend,
    errors::StoreError,
    store::{ensure_not_past, AppointmentStore},
    types::{Appointment, AvailablePatient, NewAppointment},
};
use chrono::NaiveDate;
use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};
use tracing::info;

pub const DEFAULT_PROMOTION_TIME: &str = "09:00";

/// Roster entries without an appointment.
///
/// A roster entry counts as booked as soon as any appointment carries exactly
/// its name. Two bookings under the same name therefore hide the entry until
/// both are gone.
#[derive(Debug, Clone)]
pub struct AvailabilityIndex<B: StorageBackend> {
    store: AppointmentStore<B>,
    roster: Arc<Vec<AvailablePatient>>,
}

impl<B: StorageBackend> AvailabilityIndex<B> {
    pub fn new(store: AppointmentStore<B>, roster: Vec<AvailablePatient>) -> Self {
        Self {
            store,
            roster: Arc::new(roster),
        }
    }

    pub fn roster(&self) -> &[AvailablePatient] {
        &self.roster
    }

    pub fn list_available(&self) -> Vec<AvailablePatient> {
        let booked: HashSet<String> = self
            .store
            .list()
            .into_iter()
            .map(|appointment| appointment.patient_name)
            .collect();

        self.roster
            .iter()
            .filter(|entry| !booked.contains(&entry.name))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on the reason; a blank filter matches all.
    pub fn list_available_by_reason(&self, filter: &str) -> Vec<AvailablePatient> {
        let needle = filter.trim().to_lowercase();
        let mut available = self.list_available();
        if !needle.is_empty() {
            available.retain(|entry| entry.reason.to_lowercase().contains(&needle));
        }
        available
    }

    pub fn available_reasons(&self) -> Vec<String> {
        self.list_available()
            .into_iter()
            .map(|entry| entry.reason)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find_available(&self, name: &str) -> Option<AvailablePatient> {
        self.list_available()
            .into_iter()
            .find(|entry| entry.name == name)
    }

    /// Books `entry` on `date` at the default time with its roster details.
    pub fn promote_to_appointment(
        &self,
        entry: &AvailablePatient,
        date: NaiveDate,
    ) -> Result<Appointment, StoreError> {
        ensure_not_past(date)?;

        let appointment = self.store.create(NewAppointment {
            patient_name: entry.name.clone(),
            date,
            time: Some(DEFAULT_PROMOTION_TIME.into()),
            reason: entry.reason.clone(),
            phone: Some(entry.phone.clone()),
            email: Some(entry.email.clone()),
        });

        info!(patient = %entry.name, %date, "Available patient scheduled");
        Ok(appointment)
    }

    pub fn promote_by_name(&self, name: &str, date: NaiveDate) -> Result<Appointment, StoreError> {
        let entry = self
            .find_available(name)
            .ok_or_else(|| StoreError::UnknownPatient(name.to_string()))?;
        self.promote_to_appointment(&entry, date)
    }
}
