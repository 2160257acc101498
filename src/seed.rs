use crate::{
    backend::StorageBackend,
    store::STORAGE_KEY,
    types::{today, Appointment},
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use tracing::{error, info};

// (working day offset, time, patient, reason, phone, email)
const EXAMPLES: [(usize, &str, &str, &str, &str, &str); 5] = [
    (
        0,
        "09:00",
        "María García López",
        "Routine consultation and lab results review",
        "+34 666 123 456",
        "maria.garcia@email.com",
    ),
    (
        0,
        "10:30",
        "Juan Carlos Rodríguez",
        "Recurring headaches and dizziness",
        "+34 677 987 654",
        "juan.rodriguez@email.com",
    ),
    (
        1,
        "08:00",
        "Ana Martínez Sánchez",
        "Blood pressure control",
        "+34 688 555 777",
        "ana.martinez@email.com",
    ),
    (
        1,
        "11:00",
        "Pedro González Ruiz",
        "Post-operative check and dressing change",
        "+34 699 111 222",
        "",
    ),
    (
        2,
        "14:00",
        "Carmen Fernández Torres",
        "Dermatology consultation for skin irritation",
        "+34 655 444 888",
        "carmen.fernandez@email.com",
    ),
];

/// Days after `from` that aren't Sundays, in order.
fn working_days_after(from: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..)
        .map(move |offset| from + Duration::days(offset))
        .filter(|date| date.weekday() != Weekday::Sun)
}

pub fn example_appointments(from: NaiveDate) -> Vec<Appointment> {
    let days: Vec<NaiveDate> = working_days_after(from).take(3).collect();
    let created_at = Utc::now();

    EXAMPLES
        .iter()
        .enumerate()
        .map(
            |(index, (day, time, patient_name, reason, phone, email))| Appointment {
                id: format!("example-{}", index + 1),
                patient_name: (*patient_name).into(),
                date: days[*day],
                time: Some((*time).into()),
                reason: (*reason).into(),
                phone: Some((*phone).into()),
                email: Some((*email).into()).filter(|email: &String| !email.is_empty()),
                created_at,
            },
        )
        .collect()
}

/// Writes the example appointments unless something is already stored.
/// Returns whether the examples were written.
pub fn insert_example_appointments<B: StorageBackend>(backend: &B) -> bool {
    if !backend.is_available() || backend.read(STORAGE_KEY).is_some() {
        return false;
    }

    let examples = example_appointments(today());
    let json = match serde_json::to_string(&examples) {
        Ok(json) => json,
        Err(err) => {
            error!(?err, "Failed to serialize example appointments");
            return false;
        }
    };

    match backend.write(STORAGE_KEY, json) {
        Ok(()) => {
            info!(count = examples.len(), "Inserted example appointments");
            true
        }
        Err(err) => {
            error!(%err, "Failed to insert example appointments");
            false
        }
    }
}
