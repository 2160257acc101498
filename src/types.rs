use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type AppointmentId = String;

/// A stored hospitalization appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Field values of an appointment that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_name: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub reason: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Raw form input as submitted by a patient. Nothing here is trusted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentForm {
    pub patient_name: String,
    pub date: String,
    pub time: Option<String>,
    pub reason: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Static roster entry of a patient waiting for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailablePatient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub reason: String,
}

/// Current calendar day in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Treats `None` and blank strings alike as "not provided".
pub fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}
