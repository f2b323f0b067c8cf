//! Data overview: size, date coverage, repeat patients and column summaries

use chrono::NaiveDateTime;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::descriptive::{ColumnSummary, describe_table};
use crate::error::Result;
use crate::models::Appointment;

/// First and last timestamp of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

impl DateRange {
    /// Range over a sequence of timestamps, `None` when it is empty
    pub fn from_values(values: impl IntoIterator<Item = NaiveDateTime>) -> Option<Self> {
        values
            .into_iter()
            .minmax()
            .into_option()
            .map(|(first, last)| Self { first, last })
    }
}

/// A patient with more than one appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepeatPatient {
    pub patient_id: u64,
    /// All appointments booked by this patient, the first one included
    pub total_appointments: usize,
}

/// Overview of the cleaned table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataOverview {
    /// Appointments in the cleaned table
    pub records: usize,
    /// Distinct patients
    pub patients: usize,
    /// Distinct neighbourhoods
    pub neighbourhoods: usize,
    /// Span of booking timestamps
    pub scheduled: Option<DateRange>,
    /// Span of appointment days
    pub appointments: Option<DateRange>,
    /// Patients with the most appointments, most frequent first
    pub repeat_patients: Vec<RepeatPatient>,
    /// Summary of every numeric column
    pub columns: Vec<ColumnSummary>,
}

/// Patients with more than one appointment, most appointments first
///
/// Ties are broken by patient id so the order is stable.
///
/// # Arguments
/// * `appointments` - Cleaned appointments
/// * `limit` - Maximum number of patients to return
#[must_use]
pub fn repeat_patients(appointments: &[Appointment], limit: usize) -> Vec<RepeatPatient> {
    let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
    for appointment in appointments {
        *counts.entry(appointment.patient_id).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(limit)
        .map(|(patient_id, total_appointments)| RepeatPatient {
            patient_id,
            total_appointments,
        })
        .collect()
}

/// Build the overview of a non-empty cleaned table
pub fn overview(appointments: &[Appointment], top_n: usize) -> Result<DataOverview> {
    Ok(DataOverview {
        records: appointments.len(),
        patients: appointments.iter().map(|a| a.patient_id).unique().count(),
        neighbourhoods: appointments
            .iter()
            .map(|a| a.neighbourhood.as_str())
            .unique()
            .count(),
        scheduled: DateRange::from_values(appointments.iter().map(|a| a.scheduled_at)),
        appointments: DateRange::from_values(appointments.iter().map(|a| a.appointment_at)),
        repeat_patients: repeat_patients(appointments, top_n),
        columns: describe_table(appointments)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, Gender};
    use crate::utils::date::{TimestampFormats, parse_timestamp};

    fn appointment(patient_id: u64, scheduled: &str, day: &str) -> Appointment {
        let formats = TimestampFormats::default();
        Appointment::new(
            patient_id,
            1,
            Gender::Male,
            parse_timestamp(scheduled, &formats).unwrap(),
            parse_timestamp(day, &formats).unwrap(),
            20,
            "CENTRO",
            AppointmentStatus::Showed,
        )
    }

    #[test]
    fn repeat_patients_sorted_by_count_then_id() {
        let rows: Vec<_> = [5, 3, 3, 5, 9, 3, 7, 7]
            .into_iter()
            .map(|id| appointment(id, "2016-04-20", "2016-04-29"))
            .collect();

        let top = repeat_patients(&rows, 10);
        assert_eq!(
            top,
            vec![
                RepeatPatient { patient_id: 3, total_appointments: 3 },
                RepeatPatient { patient_id: 5, total_appointments: 2 },
                RepeatPatient { patient_id: 7, total_appointments: 2 },
            ]
        );
        assert_eq!(repeat_patients(&rows, 1).len(), 1);

        let json = serde_json::to_value(top[0]).unwrap();
        assert_eq!(json["total_appointments"], 3);
    }

    #[test]
    fn overview_reports_date_ranges() {
        let rows = vec![
            appointment(1, "2016-03-01T10:00:00Z", "2016-04-29"),
            appointment(2, "2015-11-10T07:13:56Z", "2016-06-08"),
        ];
        let summary = overview(&rows, 10).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.patients, 2);
        assert_eq!(summary.neighbourhoods, 1);
        let scheduled = summary.scheduled.unwrap();
        assert_eq!(scheduled.first.to_string(), "2015-11-10 07:13:56");
        assert_eq!(scheduled.last.to_string(), "2016-03-01 10:00:00");
        assert_eq!(summary.appointments.unwrap().last.to_string(), "2016-06-08 00:00:00");
        assert!(summary.repeat_patients.is_empty());
        assert_eq!(summary.columns.len(), 8);
    }
}
