//! Appointment entity model
//!
//! `RawAppointment` mirrors one row of the source table, column names and
//! storage types included. `Appointment` is the typed, renamed record the
//! cleaning and analysis stages work on.

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{NoShowError, Result};
use crate::models::types::{AppointmentStatus, Gender};
use crate::utils::date::{TimestampFormats, parse_timestamp, waiting_days, weekday_name, weekday_of};

/// Highest `Handcap` level present in the source data
pub const MAX_HANDICAP_LEVEL: u8 = 4;

/// One row of the source table as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAppointment {
    /// Stored as a float in the CSV export
    #[serde(rename = "PatientId")]
    pub patient_id: f64,
    #[serde(rename = "AppointmentID")]
    pub appointment_id: i64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "ScheduledDay")]
    pub scheduled_day: String,
    #[serde(rename = "AppointmentDay")]
    pub appointment_day: String,
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Neighbourhood")]
    pub neighbourhood: String,
    #[serde(rename = "Scholarship")]
    pub scholarship: i64,
    #[serde(rename = "Hipertension")]
    pub hypertension: i64,
    #[serde(rename = "Diabetes")]
    pub diabetes: i64,
    #[serde(rename = "Alcoholism")]
    pub alcoholism: i64,
    #[serde(rename = "Handcap")]
    pub handicap: i64,
    #[serde(rename = "SMS_received")]
    pub sms_received: i64,
    #[serde(rename = "No-show")]
    pub no_show: String,
}

/// A typed appointment record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Appointment {
    pub patient_id: u64,
    pub appointment_id: i64,
    pub gender: Gender,
    /// When the appointment was booked
    pub scheduled_at: NaiveDateTime,
    /// Day of the appointment (time of day is always midnight)
    pub appointment_at: NaiveDateTime,
    pub age: i64,
    pub neighbourhood: String,
    /// Enrolled in the Bolsa Familia welfare programme
    pub scholarship: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub alcoholism: bool,
    /// Number of disabilities, 0 to [`MAX_HANDICAP_LEVEL`]
    pub handicap: u8,
    /// At least one reminder SMS was sent
    pub sms_received: bool,
    pub status: AppointmentStatus,
    /// Whole days between booking and appointment
    pub waiting_days: i64,
    /// Weekday of the appointment
    pub weekday: Weekday,
}

impl Appointment {
    /// Build an appointment, deriving waiting days and weekday from the timestamps
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        patient_id: u64,
        appointment_id: i64,
        gender: Gender,
        scheduled_at: NaiveDateTime,
        appointment_at: NaiveDateTime,
        age: i64,
        neighbourhood: impl Into<String>,
        status: AppointmentStatus,
    ) -> Self {
        Self {
            patient_id,
            appointment_id,
            gender,
            scheduled_at,
            appointment_at,
            age,
            neighbourhood: neighbourhood.into(),
            scholarship: false,
            hypertension: false,
            diabetes: false,
            alcoholism: false,
            handicap: 0,
            sms_received: false,
            status,
            waiting_days: waiting_days(scheduled_at, appointment_at),
            weekday: weekday_of(appointment_at),
        }
    }

    /// Recompute the derived columns from the timestamps
    pub fn derive_calendar_fields(&mut self) {
        self.waiting_days = waiting_days(self.scheduled_at, self.appointment_at);
        self.weekday = weekday_of(self.appointment_at);
    }

    /// Name of the appointment weekday
    #[must_use]
    pub const fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// Whether the patient missed the appointment
    #[must_use]
    pub const fn is_no_show(&self) -> bool {
        self.status.is_no_show()
    }
}

impl RawAppointment {
    /// Coerce the stored values into a typed [`Appointment`]
    pub fn into_appointment(self, formats: &TimestampFormats) -> Result<Appointment> {
        let id = self.appointment_id;
        let context = move |msg: String| NoShowError::validation(format!("appointment {id}: {msg}"));

        if !self.patient_id.is_finite() || self.patient_id < 0.0 {
            return Err(context(format!("invalid PatientId {}", self.patient_id)));
        }
        // Integer conversion truncates, matching how the ids were exported
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let patient_id = self.patient_id as u64;

        let gender = Gender::try_from(self.gender.as_str()).map_err(|e| context(e.to_string()))?;
        let status =
            AppointmentStatus::try_from(self.no_show.as_str()).map_err(|e| context(e.to_string()))?;

        let scheduled_at = parse_timestamp(&self.scheduled_day, formats)
            .ok_or_else(|| context(format!("unparseable ScheduledDay '{}'", self.scheduled_day)))?;
        let appointment_at = parse_timestamp(&self.appointment_day, formats).ok_or_else(|| {
            context(format!("unparseable AppointmentDay '{}'", self.appointment_day))
        })?;

        let handicap = u8::try_from(self.handicap)
            .ok()
            .filter(|level| *level <= MAX_HANDICAP_LEVEL)
            .ok_or_else(|| context(format!("Handcap level {} out of range", self.handicap)))?;

        let mut appointment = Appointment::new(
            patient_id,
            id,
            gender,
            scheduled_at,
            appointment_at,
            self.age,
            self.neighbourhood,
            status,
        );
        appointment.scholarship = flag("Scholarship", self.scholarship).map_err(context)?;
        appointment.hypertension = flag("Hipertension", self.hypertension).map_err(context)?;
        appointment.diabetes = flag("Diabetes", self.diabetes).map_err(context)?;
        appointment.alcoholism = flag("Alcoholism", self.alcoholism).map_err(context)?;
        appointment.sms_received = flag("SMS_received", self.sms_received).map_err(context)?;
        appointment.handicap = handicap;

        Ok(appointment)
    }
}

fn flag(column: &str, value: i64) -> std::result::Result<bool, String> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(format!("{column} must be 0 or 1, got {other}")),
    }
}
