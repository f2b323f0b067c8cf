//! Error handling for the no-show analysis.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while loading, cleaning or analysing appointments
#[derive(Debug, thiserror::Error)]
pub enum NoShowError {
    /// Error opening, reading or writing a file
    #[error("IO error at {path}: {source}")]
    IoError {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error from the Arrow CSV reader/writer or compute kernels
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    ParquetError(#[from] ParquetError),

    /// Error converting between record batches and typed rows
    #[error("Conversion error: {0}")]
    ConversionError(#[from] serde_arrow::Error),

    /// The input table does not have the expected layout
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A row could not be coerced into a typed appointment
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A statistic or test was asked for with data it cannot handle
    #[error("Statistics error: {0}")]
    StatisticsError(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure rendering a chart
    #[error("Plot error: {0}")]
    PlotError(String),

    /// Failure serializing the report
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl NoShowError {
    /// Wrap an IO error together with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::IoError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Shorthand for a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Shorthand for a statistics precondition failure
    pub fn statistics(msg: impl Into<String>) -> Self {
        Self::StatisticsError(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for NoShowError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        Self::ConfigError(format!("Failed to build thread pool: {error}"))
    }
}

impl From<toml::de::Error> for NoShowError {
    fn from(error: toml::de::Error) -> Self {
        Self::ConfigError(error.to_string())
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, NoShowError>;
