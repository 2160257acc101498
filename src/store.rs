use crate::{
    backend::StorageBackend,
    errors::StoreError,
    types::{today, Appointment, NewAppointment},
    validation::parse_time,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch::{self, Sender};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const STORAGE_KEY: &str = "hospital-appointments";

/// Sole owner of the appointment collection. Clones share the same collection.
#[derive(Debug, Clone)]
pub struct AppointmentStore<B: StorageBackend> {
    backend: B,
    appointments: Arc<Mutex<Vec<Appointment>>>,
    sender: Arc<Sender<Vec<Appointment>>>,
}

impl<B: StorageBackend> AppointmentStore<B> {
    pub fn new(backend: B) -> Self {
        let appointments = Self::load(&backend);
        let (sender, _) = watch::channel(sorted(&appointments));
        Self {
            backend,
            appointments: Arc::new(Mutex::new(appointments)),
            sender: Arc::new(sender),
        }
    }

    fn load(backend: &B) -> Vec<Appointment> {
        if !backend.is_available() {
            warn!("Storage is unavailable, appointments will only live as long as this process");
            return vec![];
        }

        let Some(raw) = backend.read(STORAGE_KEY) else {
            debug!("No stored appointments yet");
            return vec![];
        };

        match serde_json::from_str::<Vec<Appointment>>(&raw) {
            Ok(appointments) => {
                info!(count = appointments.len(), "Loaded stored appointments");
                appointments
            }
            Err(err) => {
                error!(?err, "Stored appointments are malformed, starting with an empty list");
                vec![]
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Appointment>> {
        self.appointments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes the whole collection through to the backend and publishes a
    /// fresh snapshot to subscribers.
    fn commit(&self, appointments: &[Appointment]) {
        if self.backend.is_available() {
            match serde_json::to_string(appointments) {
                Ok(json) => {
                    if let Err(err) = self.backend.write(STORAGE_KEY, json) {
                        error!(%err, "Failed to persist appointments");
                    }
                }
                Err(err) => error!(?err, "Failed to serialize appointments"),
            }
        } else {
            debug!("Storage is unavailable, keeping changes in memory only");
        }

        self.sender.send_replace(sorted(appointments));
    }

    pub fn list(&self) -> Vec<Appointment> {
        self.lock().clone()
    }

    /// All appointments by date and time; a missing time counts as midnight.
    pub fn list_sorted(&self) -> Vec<Appointment> {
        sorted(&self.lock())
    }

    pub fn list_by_date(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut appointments = self.list_sorted();
        appointments.retain(|appointment| appointment.date == date);
        appointments
    }

    /// Appointments from today on, without purging the older ones.
    pub fn list_current(&self) -> Vec<Appointment> {
        let today = today();
        let mut appointments = self.list_sorted();
        appointments.retain(|appointment| appointment.date >= today);
        appointments
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.lock()
            .iter()
            .find(|appointment| appointment.id == id)
            .cloned()
    }

    /// Stores an already validated appointment under a fresh id.
    pub fn create(&self, new_appointment: NewAppointment) -> Appointment {
        let mut appointments = self.lock();

        let id = loop {
            let id = Uuid::now_v7().to_string();
            if !appointments.iter().any(|appointment| appointment.id == id) {
                break id;
            }
        };

        let appointment = Appointment {
            id,
            patient_name: new_appointment.patient_name,
            date: new_appointment.date,
            time: non_blank(new_appointment.time),
            reason: new_appointment.reason,
            phone: non_blank(new_appointment.phone),
            email: non_blank(new_appointment.email),
            created_at: Utc::now(),
        };
        appointments.push(appointment.clone());
        self.commit(&appointments);

        info!(id = %appointment.id, date = %appointment.date, "Appointment created");
        appointment
    }

    /// Moves an appointment to another day. Days before today are refused.
    pub fn update_date(&self, id: &str, date: NaiveDate) -> Result<(), StoreError> {
        let mut appointments = self.lock();

        let Some(index) = appointments
            .iter()
            .position(|appointment| appointment.id == id)
        else {
            let err = StoreError::NotFound(id.to_string());
            error!(%err);
            return Err(err);
        };
        ensure_not_past(date)?;

        let previous = std::mem::replace(&mut appointments[index].date, date);
        self.commit(&appointments);

        info!(id, %previous, %date, "Appointment moved");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<Appointment, StoreError> {
        let mut appointments = self.lock();

        let Some(index) = appointments
            .iter()
            .position(|appointment| appointment.id == id)
        else {
            let err = StoreError::NotFound(id.to_string());
            error!(%err);
            return Err(err);
        };

        let removed = appointments.remove(index);
        self.commit(&appointments);

        info!(id, "Appointment deleted");
        Ok(removed)
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_before(today())
    }

    /// Drops every appointment dated strictly before `today` and returns how
    /// many went away. Storage is only touched when something was removed.
    pub fn sweep_expired_before(&self, today: NaiveDate) -> usize {
        let mut appointments = self.lock();

        let before = appointments.len();
        appointments.retain(|appointment| appointment.date >= today);
        let removed = before - appointments.len();

        if removed > 0 {
            self.commit(&appointments);
            info!(removed, %today, "Removed expired appointments");
        }
        removed
    }

    /// Sorted snapshots, starting with the current one and followed by one
    /// after every change.
    pub fn subscribe(&self) -> WatchStream<Vec<Appointment>> {
        WatchStream::new(self.sender.subscribe())
    }
}

pub fn ensure_not_past(date: NaiveDate) -> Result<(), StoreError> {
    let today = today();
    if date < today {
        let err = StoreError::PastDate { date, today };
        error!(%err);
        return Err(err);
    }
    Ok(())
}

pub fn scheduled_at(appointment: &Appointment) -> NaiveDateTime {
    let time = appointment
        .time
        .as_deref()
        .and_then(parse_time)
        .unwrap_or(NaiveTime::MIN);
    appointment.date.and_time(time)
}

fn sorted(appointments: &[Appointment]) -> Vec<Appointment> {
    let mut appointments = appointments.to_vec();
    // stable, equal instants keep insertion order
    appointments.sort_by_key(scheduled_at);
    appointments
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
