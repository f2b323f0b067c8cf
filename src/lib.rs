//! Exploratory analysis of medical appointment no-shows.
//!
//! Loads an appointment table (CSV or Parquet) into typed records, cleans
//! known data-entry errors, derives waiting time and weekday, and answers a
//! fixed set of questions about who misses appointments with contingency
//! tables, significance tests and charts.

pub mod algorithm;
pub mod analysis;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod schema;
pub mod utils;

// Core types
pub use config::{AnalysisConfig, ExportFormat};
pub use error::{NoShowError, Result};
pub use models::{Appointment, AppointmentStatus, Gender, HealthFlag, RawAppointment};

// Pipeline stages
pub use analysis::{AnalysisReport, analyze};
pub use cleaning::{Cleaner, CleaningReport, RowFilter, clean};
pub use loader::load_appointments;
pub use pipeline::{RunOutput, run};

// Statistics
pub use algorithm::{ChiSquareResult, ContingencyTable, TTestResult, chi2_contingency, ttest_ind};

// Arrow types
pub use arrow::record_batch::RecordBatch;
pub use utils::DEFAULT_BATCH_SIZE;
