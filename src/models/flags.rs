//! The categorical health and welfare columns.

use serde::Serialize;

use crate::models::appointment::Appointment;

/// A categorical column compared against appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HealthFlag {
    Scholarship,
    Hypertension,
    Diabetes,
    Alcoholism,
    Handicap,
    SmsReceived,
}

impl HealthFlag {
    /// All flags in report order
    pub const ALL: [Self; 6] = [
        Self::Scholarship,
        Self::Hypertension,
        Self::Diabetes,
        Self::Alcoholism,
        Self::Handicap,
        Self::SmsReceived,
    ];

    /// Column name after renaming
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Scholarship => "scholarship",
            Self::Hypertension => "hypertension",
            Self::Diabetes => "diabetes",
            Self::Alcoholism => "alcoholism",
            Self::Handicap => "handicap",
            Self::SmsReceived => "sms_received",
        }
    }

    /// Display name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scholarship => "Scholarship",
            Self::Hypertension => "Hypertension",
            Self::Diabetes => "Diabetes",
            Self::Alcoholism => "Alcoholism",
            Self::Handicap => "Handicap",
            Self::SmsReceived => "SMS received",
        }
    }

    /// Level of this flag for one appointment (0/1, or 0..=4 for handicap)
    #[must_use]
    pub fn level(self, appointment: &Appointment) -> u8 {
        match self {
            Self::Scholarship => u8::from(appointment.scholarship),
            Self::Hypertension => u8::from(appointment.hypertension),
            Self::Diabetes => u8::from(appointment.diabetes),
            Self::Alcoholism => u8::from(appointment.alcoholism),
            Self::Handicap => appointment.handicap,
            Self::SmsReceived => u8::from(appointment.sms_received),
        }
    }
}
