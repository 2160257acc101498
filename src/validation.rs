use crate::types::{provided, AppointmentForm, NewAppointment};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_REASON_LENGTH: usize = 5;

/// First and last bookable start hour; 17:00 itself is still accepted.
pub const OPENING_HOUR: u32 = 8;
pub const CLOSING_HOUR: u32 = 17;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_PATTERN: Regex = Regex::new(r"^[0-9\-+()\s]{10,}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PatientName,
    Date,
    Time,
    Reason,
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    TooShort { min: usize },
    Required,
    InvalidFormat,
    PastDate,
    SundayNotAllowed,
    OutOfHours,
}

impl FieldError {
    pub fn message(&self, field: Field) -> String {
        match (self, field) {
            (FieldError::TooShort { min }, Field::PatientName) => {
                format!("Name must be at least {min} characters long")
            }
            (FieldError::TooShort { min }, Field::Reason) => {
                format!("Reason must be at least {min} characters long")
            }
            (FieldError::TooShort { min }, _) => format!("Must be at least {min} characters long"),
            (FieldError::Required, _) => "This field is required".into(),
            (FieldError::InvalidFormat, Field::Date) => "Date must use the YYYY-MM-DD format".into(),
            (FieldError::InvalidFormat, Field::Time) => "Time must use the HH:MM format".into(),
            (FieldError::InvalidFormat, Field::Email) => "Email address is not valid".into(),
            (FieldError::InvalidFormat, Field::Phone) => {
                "Phone number must have at least 10 digits".into()
            }
            (FieldError::InvalidFormat, _) => "Invalid format".into(),
            (FieldError::PastDate, _) => "Appointments can't be scheduled in the past".into(),
            (FieldError::SundayNotAllowed, _) => "Appointments can't be scheduled on Sundays".into(),
            (FieldError::OutOfHours, _) => format!(
                "Attended hours are {OPENING_HOUR:02}:00 to {CLOSING_HOUR:02}:00"
            ),
        }
    }
}

/// Field-keyed validation result. At most one error is kept per field: a later
/// check on the same field replaces an earlier one, so a past Sunday reports
/// `SundayNotAllowed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    fn record(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn messages(&self) -> BTreeMap<Field, String> {
        self.errors
            .iter()
            .map(|(field, error)| (*field, error.message(*field)))
            .collect()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.messages().serialize(serializer)
    }
}

pub fn has_errors(errors: &ValidationErrors) -> bool {
    errors.has_errors()
}

/// Parses a zero-padded `YYYY-MM-DD` date. chrono alone would also take
/// `2030-1-7`, so the length is checked first.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

pub fn within_attended_window(time: NaiveTime) -> bool {
    let minute_of_day = time.hour() * 60 + time.minute();
    (OPENING_HOUR * 60..=CLOSING_HOUR * 60).contains(&minute_of_day)
}

/// Checks every field of `form` independently against the admission rules.
/// `today` is the reference day for the past-date rule.
pub fn validate_appointment(form: &AppointmentForm, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.patient_name.trim().chars().count() < MIN_NAME_LENGTH {
        errors.record(Field::PatientName, FieldError::TooShort { min: MIN_NAME_LENGTH });
    }

    if form.date.trim().is_empty() {
        errors.record(Field::Date, FieldError::Required);
    } else {
        match parse_date(&form.date) {
            Some(date) => {
                if date < today {
                    errors.record(Field::Date, FieldError::PastDate);
                }
                if date.weekday() == Weekday::Sun {
                    errors.record(Field::Date, FieldError::SundayNotAllowed);
                }
            }
            None => errors.record(Field::Date, FieldError::InvalidFormat),
        }
    }

    if let Some(time) = provided(&form.time) {
        match parse_time(time) {
            Some(time) if within_attended_window(time) => {}
            Some(_) => errors.record(Field::Time, FieldError::OutOfHours),
            None => errors.record(Field::Time, FieldError::InvalidFormat),
        }
    }

    if form.reason.trim().chars().count() < MIN_REASON_LENGTH {
        errors.record(Field::Reason, FieldError::TooShort { min: MIN_REASON_LENGTH });
    }

    if let Some(email) = provided(&form.email) {
        if !EMAIL_PATTERN.is_match(email) {
            errors.record(Field::Email, FieldError::InvalidFormat);
        }
    }

    if let Some(phone) = provided(&form.phone) {
        if !PHONE_PATTERN.is_match(phone) {
            errors.record(Field::Phone, FieldError::InvalidFormat);
        }
    }

    errors
}

impl AppointmentForm {
    /// Validates the form and, if it is clean, turns it into a storable record.
    pub fn into_new_appointment(self, today: NaiveDate) -> Result<NewAppointment, ValidationErrors> {
        let errors = validate_appointment(&self, today);
        let date = match parse_date(&self.date) {
            Some(date) if !errors.has_errors() => date,
            _ => return Err(errors),
        };

        Ok(NewAppointment {
            patient_name: self.patient_name.trim().to_string(),
            date,
            time: provided(&self.time).map(|time| time.trim().to_string()),
            reason: self.reason.trim().to_string(),
            phone: provided(&self.phone).map(str::to_string),
            email: provided(&self.email).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::{next_sunday, past_weekday, upcoming_weekday};
    use chrono::Duration;

    fn form(patient_name: &str, date: NaiveDate, reason: &str) -> AppointmentForm {
        AppointmentForm {
            patient_name: patient_name.into(),
            date: date.format(DATE_FORMAT).to_string(),
            reason: reason.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_short_name_is_the_only_error() {
        let today = upcoming_weekday(crate::types::today());
        let errors = validate_appointment(&form("A", today, "abcde"), today);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::PatientName),
            Some(FieldError::TooShort { min: 2 })
        );
        assert_eq!(errors.get(Field::Date), None);
        assert_eq!(errors.get(Field::Reason), None);
        assert!(has_errors(&errors));
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let today = crate::types::today();
        let date = upcoming_weekday(today);
        let mut form = form("Lucia Romero", date, "Scheduled knee surgery");
        form.time = Some("10:30".into());
        form.email = Some("lucia@example.org".into());
        form.phone = Some("+34 (611) 222-333".into());

        let errors = validate_appointment(&form, today);
        assert!(!errors.has_errors(), "{:?}", errors);
    }

    #[test]
    fn test_sunday_is_rejected_even_in_the_future() {
        let today = crate::types::today();
        let errors = validate_appointment(&form("Lucia", next_sunday(today), "Checkup"), today);
        assert_eq!(errors.get(Field::Date), Some(FieldError::SundayNotAllowed));
    }

    #[test]
    fn test_past_weekday_is_rejected() {
        let today = crate::types::today();
        let errors = validate_appointment(&form("Lucia", past_weekday(today), "Checkup"), today);
        assert_eq!(errors.get(Field::Date), Some(FieldError::PastDate));
    }

    #[test]
    fn test_yesterday_is_always_an_error() {
        let today = crate::types::today();
        let yesterday = today - Duration::days(1);
        let errors = validate_appointment(&form("Lucia", yesterday, "Checkup"), today);
        assert!(errors.get(Field::Date).is_some());
    }

    #[test]
    fn test_past_sunday_reports_the_last_check() {
        let today = crate::types::today();
        let past_sunday = next_sunday(today) - Duration::weeks(2);
        let errors = validate_appointment(&form("Lucia", past_sunday, "Checkup"), today);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Date), Some(FieldError::SundayNotAllowed));
    }

    #[test_case::test_case("", FieldError::Required)]
    #[test_case::test_case("   ", FieldError::Required)]
    #[test_case::test_case("21/07/2025", FieldError::InvalidFormat)]
    #[test_case::test_case("2025-02-30", FieldError::InvalidFormat)]
    #[test_case::test_case("2030-1-7", FieldError::InvalidFormat)]
    #[test_case::test_case("2030-01-7", FieldError::InvalidFormat)]
    fn test_missing_or_malformed_date(date: &str, expected: FieldError) {
        let mut form = AppointmentForm {
            patient_name: "Lucia".into(),
            reason: "Checkup".into(),
            ..Default::default()
        };
        form.date = date.into();

        let errors = validate_appointment(&form, crate::types::today());
        assert_eq!(errors.get(Field::Date), Some(expected));
    }

    #[test_case::test_case("07:59", Some(FieldError::OutOfHours))]
    #[test_case::test_case("08:00", None)]
    #[test_case::test_case("12:45", None)]
    #[test_case::test_case("17:00", None)]
    #[test_case::test_case("17:01", Some(FieldError::OutOfHours))]
    #[test_case::test_case("23:00", Some(FieldError::OutOfHours))]
    #[test_case::test_case("noon", Some(FieldError::InvalidFormat))]
    #[test_case::test_case("", None)]
    fn test_attended_window(time: &str, expected: Option<FieldError>) {
        let today = crate::types::today();
        let mut form = form("Lucia", upcoming_weekday(today), "Checkup");
        form.time = Some(time.into());

        let errors = validate_appointment(&form, today);
        assert_eq!(errors.get(Field::Time), expected);
    }

    #[test_case::test_case("Ana", None)]
    #[test_case::test_case("  A  ", Some(FieldError::TooShort { min: 2 }))]
    #[test_case::test_case("", Some(FieldError::TooShort { min: 2 }))]
    fn test_patient_name_length(name: &str, expected: Option<FieldError>) {
        let today = crate::types::today();
        let errors = validate_appointment(&form(name, upcoming_weekday(today), "Checkup"), today);
        assert_eq!(errors.get(Field::PatientName), expected);
    }

    #[test_case::test_case("Pain", Some(FieldError::TooShort { min: 5 }))]
    #[test_case::test_case("  Pain    ", Some(FieldError::TooShort { min: 5 }))]
    #[test_case::test_case("Fever", None)]
    fn test_reason_length(reason: &str, expected: Option<FieldError>) {
        let today = crate::types::today();
        let errors = validate_appointment(&form("Lucia", upcoming_weekday(today), reason), today);
        assert_eq!(errors.get(Field::Reason), expected);
    }

    #[test_case::test_case("maria.garcia@email.com", None)]
    #[test_case::test_case("maria@email", Some(FieldError::InvalidFormat))]
    #[test_case::test_case("maria garcia@email.com", Some(FieldError::InvalidFormat))]
    #[test_case::test_case("@email.com", Some(FieldError::InvalidFormat))]
    #[test_case::test_case("   ", None)]
    fn test_email_format(email: &str, expected: Option<FieldError>) {
        let today = crate::types::today();
        let mut form = form("Lucia", upcoming_weekday(today), "Checkup");
        form.email = Some(email.into());

        let errors = validate_appointment(&form, today);
        assert_eq!(errors.get(Field::Email), expected);
    }

    #[test_case::test_case("+34 666 123 456", None)]
    #[test_case::test_case("(555) 123-4567", None)]
    #[test_case::test_case("123456789", Some(FieldError::InvalidFormat))]
    #[test_case::test_case("555-CALL-NOW", Some(FieldError::InvalidFormat))]
    fn test_phone_format(phone: &str, expected: Option<FieldError>) {
        let today = crate::types::today();
        let mut form = form("Lucia", upcoming_weekday(today), "Checkup");
        form.phone = Some(phone.into());

        let errors = validate_appointment(&form, today);
        assert_eq!(errors.get(Field::Phone), expected);
    }

    #[test]
    fn test_all_failures_are_reported_together() {
        let today = crate::types::today();
        let form = AppointmentForm {
            patient_name: "A".into(),
            date: String::new(),
            time: Some("06:00".into()),
            reason: "x".into(),
            phone: Some("12".into()),
            email: Some("nope".into()),
        };

        let errors = validate_appointment(&form, today);
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                Field::PatientName,
                Field::Date,
                Field::Time,
                Field::Reason,
                Field::Email,
                Field::Phone
            ]
        );
    }

    #[test]
    fn test_errors_serialize_as_field_messages() {
        let today = upcoming_weekday(crate::types::today());
        let errors = validate_appointment(&form("A", today, "abcde"), today);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "patientName": "Name must be at least 2 characters long" })
        );
    }

    #[test]
    fn test_into_new_appointment_normalizes_fields() {
        let today = crate::types::today();
        let date = upcoming_weekday(today);
        let form = AppointmentForm {
            patient_name: "  Lucia Romero ".into(),
            date: date.format(DATE_FORMAT).to_string(),
            time: Some(" ".into()),
            reason: "Scheduled knee surgery".into(),
            phone: Some(String::new()),
            email: Some("lucia@example.org".into()),
        };

        let new_appointment = form.into_new_appointment(today).unwrap();
        assert_eq!(new_appointment.patient_name, "Lucia Romero");
        assert_eq!(new_appointment.date, date);
        assert_eq!(new_appointment.time, None);
        assert_eq!(new_appointment.phone, None);
        assert_eq!(new_appointment.email.as_deref(), Some("lucia@example.org"));
    }

    #[test]
    fn test_into_new_appointment_returns_errors() {
        let today = crate::types::today();
        let errors = form("A", upcoming_weekday(today), "abcde")
            .into_new_appointment(today)
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::PatientName]);
    }
}
