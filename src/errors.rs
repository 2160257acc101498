use crate::types::AppointmentId;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Appointment {0} does not exist")]
    NotFound(AppointmentId),

    #[error("Can't schedule on {date}, it is before {today}")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("Patient {0} is not on the list of available patients")]
    UnknownPatient(String),
}
