//! Layout of the appointment table.
//!
//! The source table is read with an explicit Arrow schema rather than type
//! inference: `PatientId` must arrive as a float, the flag columns as
//! integers, and the two day columns as text that is parsed later.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::error::{NoShowError, Result};

/// Source column names with their storage types, in the order of the
/// published dataset
pub const RAW_COLUMNS: [(&str, DataType); 14] = [
    ("PatientId", DataType::Float64),
    ("AppointmentID", DataType::Int64),
    ("Gender", DataType::Utf8),
    ("ScheduledDay", DataType::Utf8),
    ("AppointmentDay", DataType::Utf8),
    ("Age", DataType::Int64),
    ("Neighbourhood", DataType::Utf8),
    ("Scholarship", DataType::Int64),
    ("Hipertension", DataType::Int64),
    ("Diabetes", DataType::Int64),
    ("Alcoholism", DataType::Int64),
    ("Handcap", DataType::Int64),
    ("SMS_received", DataType::Int64),
    ("No-show", DataType::Utf8),
];

/// A schema problem found while checking an input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Column the issue concerns
    pub column: String,
    /// Description of the problem
    pub description: String,
}

/// Result of checking an input header against [`RAW_COLUMNS`]
#[derive(Debug, Clone, Default)]
pub struct SchemaCompatibilityReport {
    /// Whether every required column is present
    pub compatible: bool,
    /// Missing columns
    pub issues: Vec<SchemaIssue>,
    /// Columns present in the input but not used
    pub ignored_columns: Vec<String>,
}

impl SchemaCompatibilityReport {
    /// Turn an incompatible report into a schema error
    pub fn into_result(self) -> Result<Self> {
        if self.compatible {
            return Ok(self);
        }
        let detail = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.column, issue.description))
            .collect::<Vec<_>>()
            .join("; ");
        Err(NoShowError::SchemaError(detail))
    }
}

/// The raw schema with every column required and non-nullable
#[must_use]
pub fn raw_schema() -> Schema {
    Schema::new(
        RAW_COLUMNS
            .iter()
            .map(|(name, data_type)| Field::new(*name, data_type.clone(), false))
            .collect::<Vec<_>>(),
    )
}

/// Compare the columns found in an input file with the required ones
#[must_use]
pub fn check_columns<S: AsRef<str>>(found: &[S]) -> SchemaCompatibilityReport {
    let issues: Vec<SchemaIssue> = RAW_COLUMNS
        .iter()
        .filter(|(name, _)| !found.iter().any(|f| f.as_ref() == *name))
        .map(|(name, _)| SchemaIssue {
            column: (*name).to_string(),
            description: "required column is missing".to_string(),
        })
        .collect();

    let ignored_columns = found
        .iter()
        .map(AsRef::as_ref)
        .filter(|f| !RAW_COLUMNS.iter().any(|(name, _)| name == f))
        .map(str::to_string)
        .collect();

    SchemaCompatibilityReport {
        compatible: issues.is_empty(),
        issues,
        ignored_columns,
    }
}

/// Build a reader schema matching the column order of a CSV header
///
/// Known columns get their storage type; unknown columns are read as text
/// and dropped by the projection returned alongside.
pub fn csv_schema_for_header<S: AsRef<str>>(header: &[S]) -> Result<(SchemaRef, Vec<usize>)> {
    check_columns(header).into_result()?;

    let fields: Vec<Field> = header
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match RAW_COLUMNS.iter().find(|(col, _)| *col == name) {
                Some((_, data_type)) => Field::new(name, data_type.clone(), false),
                None => Field::new(name, DataType::Utf8, true),
            }
        })
        .collect();

    let projection = RAW_COLUMNS
        .iter()
        .filter_map(|(name, _)| header.iter().position(|h| h.as_ref() == *name))
        .collect();

    Ok((Arc::new(Schema::new(fields)), projection))
}

/// Split a CSV header line into column names
#[must_use]
pub fn parse_header_line(line: &str) -> Vec<String> {
    line.trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|name| name.trim().trim_matches('"').to_string())
        .collect()
}
