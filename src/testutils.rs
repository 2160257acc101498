use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::{backend::StorageBackend, types::NewAppointment};

pub struct MockStorageInner {
    pub success: AtomicBool,
    pub available: AtomicBool,
    pub calls_to_read: AtomicU64,
    pub calls_to_write: AtomicU64,
    pub entries: Mutex<HashMap<String, String>>,
}

#[derive(Clone)]
pub struct MockStorage(pub Arc<MockStorageInner>);

impl MockStorageInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            available: AtomicBool::new(true),
            calls_to_read: AtomicU64::default(),
            calls_to_write: AtomicU64::default(),
            entries: Mutex::default(),
        }
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self(Arc::new(MockStorageInner::new()))
    }
}

impl StorageBackend for MockStorage {
    fn is_available(&self) -> bool {
        self.0.available.load(Ordering::SeqCst)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.0.calls_to_read.fetch_add(1, Ordering::SeqCst);
        self.0.entries.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: String) -> Result<(), String> {
        self.0.calls_to_write.fetch_add(1, Ordering::SeqCst);
        if !self.0.success.load(Ordering::SeqCst) {
            return Err("Supposed to fail".into());
        }
        self.0.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

pub fn new_appointment(patient_name: &str, date: NaiveDate) -> NewAppointment {
    NewAppointment {
        patient_name: patient_name.into(),
        date,
        time: Some("10:00".into()),
        reason: "Scheduled admission".into(),
        phone: Some("+34 600 000 000".into()),
        email: Some("patient@example.org".into()),
    }
}

/// `date` itself, or the Monday after when `date` is a Sunday.
pub fn upcoming_weekday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// The closest day before `date` that isn't a Sunday.
pub fn past_weekday(date: NaiveDate) -> NaiveDate {
    let yesterday = date - Duration::days(1);
    match yesterday.weekday() {
        Weekday::Sun => yesterday - Duration::days(1),
        _ => yesterday,
    }
}

/// First Sunday strictly after `date`.
pub fn next_sunday(date: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - i64::from(date.weekday().num_days_from_sunday());
    date + Duration::days(days_ahead)
}
