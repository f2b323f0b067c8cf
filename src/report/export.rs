//! Export of the cleaned appointment table
//!
//! Rows are flattened into [`CleanedRow`], converted to a record batch with
//! `serde_arrow`, and written with the Arrow CSV writer or the Parquet
//! `ArrowWriter`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::config::ExportFormat;
use crate::error::Result;
use crate::error::util::safe_create_file;
use crate::models::Appointment;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One row of the exported table, with renamed and derived columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedRow {
    pub patient_id: u64,
    pub appointment_id: i64,
    pub gender: String,
    pub scheduled_day: String,
    pub appointment_day: String,
    pub age: i64,
    pub neighbourhood: String,
    pub scholarship: u8,
    pub hypertension: u8,
    pub diabetes: u8,
    pub alcoholism: u8,
    pub handicap: u8,
    pub sms_received: u8,
    pub no_show: String,
    pub waiting_days: i64,
    pub weekday: String,
}

impl From<&Appointment> for CleanedRow {
    fn from(a: &Appointment) -> Self {
        Self {
            patient_id: a.patient_id,
            appointment_id: a.appointment_id,
            gender: a.gender.code().to_string(),
            scheduled_day: a.scheduled_at.format(TIMESTAMP_FORMAT).to_string(),
            appointment_day: a.appointment_at.format(TIMESTAMP_FORMAT).to_string(),
            age: a.age,
            neighbourhood: a.neighbourhood.clone(),
            scholarship: u8::from(a.scholarship),
            hypertension: u8::from(a.hypertension),
            diabetes: u8::from(a.diabetes),
            alcoholism: u8::from(a.alcoholism),
            handicap: a.handicap,
            sms_received: u8::from(a.sms_received),
            no_show: a.status.source_value().to_string(),
            waiting_days: a.waiting_days,
            weekday: a.weekday_name().to_string(),
        }
    }
}

/// Convert appointments into a single record batch
pub fn to_record_batch(appointments: &[Appointment]) -> Result<RecordBatch> {
    let rows: Vec<CleanedRow> = appointments.iter().map(CleanedRow::from).collect();
    let fields = Vec::<FieldRef>::from_samples(&rows, TracingOptions::default())?;
    Ok(serde_arrow::to_record_batch(&fields, &rows)?)
}

/// Write the cleaned table to `dir/cleaned_appointments.<ext>`
///
/// Returns `None` without writing when there are no rows, since the schema
/// is traced from the rows themselves.
pub fn export_cleaned(
    appointments: &[Appointment],
    dir: &Path,
    format: ExportFormat,
) -> Result<Option<PathBuf>> {
    let path = dir.join(format!("cleaned_appointments.{}", format.extension()));
    if appointments.is_empty() {
        log_warning("No rows to export, skipping", Some(&path));
        return Ok(None);
    }

    let start = Instant::now();
    log_operation_start("Exporting cleaned appointments to", &path);

    let batch = to_record_batch(appointments)?;
    let file = safe_create_file(&path)?;
    match format {
        ExportFormat::Csv => {
            let mut writer = WriterBuilder::new().with_header(true).build(file);
            writer.write(&batch)?;
        }
        ExportFormat::Parquet => {
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
            writer.write(&batch)?;
            writer.close()?;
        }
    }

    log_operation_complete("exported", &path, batch.num_rows(), Some(start.elapsed()));
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, Gender};
    use crate::utils::date::{TimestampFormats, parse_timestamp};

    fn sample() -> Appointment {
        let formats = TimestampFormats::default();
        let mut appointment = Appointment::new(
            29_872_499_824_296,
            5_642_903,
            Gender::Female,
            parse_timestamp("2016-04-29T18:38:08Z", &formats).unwrap(),
            parse_timestamp("2016-04-29T00:00:00Z", &formats).unwrap(),
            62,
            "JARDIM DA PENHA",
            AppointmentStatus::NoShow,
        );
        appointment.hypertension = true;
        appointment.waiting_days = 0;
        appointment
    }

    #[test]
    fn rows_carry_renamed_and_derived_columns() {
        let row = CleanedRow::from(&sample());
        assert_eq!(row.gender, "F");
        assert_eq!(row.scheduled_day, "2016-04-29T18:38:08");
        assert_eq!(row.hypertension, 1);
        assert_eq!(row.no_show, "Yes");
        assert_eq!(row.weekday, "Friday");
    }

    #[test]
    fn record_batch_has_one_column_per_field() {
        let batch = to_record_batch(&[sample(), sample()]).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 16);
        assert!(batch.schema().field_with_name("waiting_days").is_ok());
    }

    #[test]
    fn empty_export_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_cleaned(&[], dir.path(), ExportFormat::Csv).unwrap();
        assert!(written.is_none());
        assert!(!dir.path().join("cleaned_appointments.csv").exists());
    }
}
