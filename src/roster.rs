use crate::types::AvailablePatient;

const ROSTER: [(&str, &str, &str, &str); 6] = [
    (
        "Laura Jiménez Castro",
        "+34 611 234 567",
        "laura.jimenez@email.com",
        "Scheduled cholecystectomy",
    ),
    (
        "Miguel Ángel Ortega",
        "+34 622 345 678",
        "miguel.ortega@email.com",
        "Cardiac monitoring after arrhythmia",
    ),
    (
        "Sofía Herrera Molina",
        "+34 633 456 789",
        "sofia.herrera@email.com",
        "Knee replacement surgery",
    ),
    (
        "Javier Navarro Gil",
        "+34 644 567 890",
        "javier.navarro@email.com",
        "Cardiac monitoring after bypass",
    ),
    (
        "Elena Ruiz Domínguez",
        "+34 655 678 901",
        "elena.ruiz@email.com",
        "Pneumonia treatment",
    ),
    (
        "Andrés Morales Vega",
        "+34 666 789 012",
        "andres.morales@email.com",
        "Post-operative observation",
    ),
];

/// Patients waiting to be admitted. Reference data, never persisted.
pub fn default_roster() -> Vec<AvailablePatient> {
    ROSTER
        .iter()
        .map(|(name, phone, email, reason)| AvailablePatient {
            name: (*name).into(),
            phone: (*phone).into(),
            email: (*email).into(),
            reason: (*reason).into(),
        })
        .collect()
}
