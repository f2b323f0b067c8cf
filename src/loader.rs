//! Appointment table loading
//!
//! Reads the source table into Arrow record batches (CSV through the Arrow
//! CSV reader, Parquet through the Arrow Parquet reader) and converts the
//! batches into typed [`Appointment`]s in parallel.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::error::util::safe_open_file;
use crate::error::{NoShowError, Result};
use crate::models::{Appointment, RawAppointment};
use crate::schema::{check_columns, csv_schema_for_header, parse_header_line};
use crate::utils::date::TimestampFormats;
use crate::utils::logging::{
    create_spinner, finish_progress_bar, log_operation_complete, log_operation_start, log_warning,
};

/// Storage format of an input table, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Parquet,
}

impl InputFormat {
    /// Detect the format from the extension; anything but `.parquet` is CSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Self::Parquet,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => {
                log_warning("Unrecognized input extension, reading as CSV", Some(path));
                Self::Csv
            }
        }
    }
}

/// Read a CSV file into Arrow record batches restricted to the required columns
pub fn read_csv(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading CSV file", path);

    let mut header_line = String::new();
    BufReader::new(safe_open_file(path, "reading the CSV header")?)
        .read_line(&mut header_line)
        .map_err(|e| NoShowError::io(path, e))?;
    if header_line.trim().is_empty() {
        return Err(NoShowError::SchemaError(format!(
            "{} has no header row",
            path.display()
        )));
    }

    let header = parse_header_line(&header_line);
    let (schema, projection) = csv_schema_for_header(&header)?;

    let file = safe_open_file(path, "reading appointment data")?;
    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(batch_size)
        .with_projection(projection)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete(
        "read",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(batches)
}

/// Read a Parquet file into Arrow record batches restricted to the required columns
pub fn read_parquet(path: &Path, batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = safe_open_file(path, "reading appointment data")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let file_columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let report = check_columns(&file_columns).into_result()?;
    if !report.ignored_columns.is_empty() {
        log::debug!("Ignoring parquet columns: {:?}", report.ignored_columns);
    }

    let projection: Vec<usize> = file_columns
        .iter()
        .enumerate()
        .filter(|(_, name)| !report.ignored_columns.contains(*name))
        .map(|(idx, _)| idx)
        .collect();
    let mask = ProjectionMask::roots(builder.parquet_schema(), projection);

    let reader = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete(
        "read",
        path,
        batches.iter().map(RecordBatch::num_rows).sum(),
        Some(start.elapsed()),
    );
    Ok(batches)
}

/// Convert one record batch into typed appointments
pub fn batch_to_appointments(
    batch: &RecordBatch,
    formats: &TimestampFormats,
) -> Result<Vec<Appointment>> {
    let rows: Vec<RawAppointment> = serde_arrow::from_record_batch(batch)?;
    rows.into_iter()
        .map(|row| row.into_appointment(formats))
        .collect()
}

/// Convert record batches into appointments, one rayon task per batch
///
/// Row order follows batch order.
pub fn batches_to_appointments(
    batches: &[RecordBatch],
    formats: &TimestampFormats,
) -> Result<Vec<Appointment>> {
    let converted = batches
        .par_iter()
        .map(|batch| batch_to_appointments(batch, formats))
        .collect::<Result<Vec<_>>>()?;

    Ok(converted.into_iter().flatten().collect())
}

/// Load the configured input table as typed appointments
pub fn load_appointments(config: &AnalysisConfig) -> Result<Vec<Appointment>> {
    let path = config.input_path.as_path();
    let spinner = create_spinner(
        Some(&format!("Loading {}", path.display())),
        config.show_progress,
    );

    let loaded = match InputFormat::from_path(path) {
        InputFormat::Csv => read_csv(path, config.batch_size),
        InputFormat::Parquet => read_parquet(path, config.batch_size),
    }
    .and_then(|batches| batches_to_appointments(&batches, &config.timestamp_formats));

    match &loaded {
        Ok(appointments) => finish_progress_bar(
            &spinner,
            Some(&format!("Loaded {} appointments", appointments.len())),
        ),
        Err(_) => finish_progress_bar(&spinner, None),
    }

    let appointments = loaded?;
    if appointments.is_empty() {
        log_warning("Input table contains no appointments", Some(path));
    }
    Ok(appointments)
}
