//! Configuration for the no-show analysis.
//!
//! Defaults reproduce the standard analysis; a TOML file can override any
//! subset of the fields and the binary applies command-line overrides last.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NoShowError, Result};
use crate::error::util::safe_read_to_string;
use crate::utils::DEFAULT_BATCH_SIZE;
use crate::utils::date::TimestampFormats;

/// Output format for the cleaned dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl ExportFormat {
    /// File extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = NoShowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(NoShowError::ConfigError(format!(
                "Unknown export format '{other}' (expected csv or parquet)"
            ))),
        }
    }
}

/// Configuration for an analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Appointment table to read (`.csv` or `.parquet`)
    pub input_path: PathBuf,
    /// Directory receiving the report, tables, charts and export
    pub output_dir: PathBuf,
    /// Rows per record batch when reading CSV
    pub batch_size: usize,
    /// Worker threads for batch conversion
    pub num_threads: usize,
    /// p-value at or below which a test counts as significant
    pub significance_level: f64,
    /// Number of neighbourhoods and patients in the top-N listings
    pub top_n: usize,
    /// Treat a waiting time of -1 day as a same-day appointment (0 days)
    pub fix_same_day: bool,
    /// Render SVG charts
    pub write_plots: bool,
    /// Export the cleaned dataset in this format
    pub export_format: Option<ExportFormat>,
    /// Show a spinner while loading
    pub show_progress: bool,
    /// Accepted timestamp layouts for the two day columns
    pub timestamp_formats: TimestampFormats,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("noshowappointments-kagglev2-may-2016.csv"),
            output_dir: PathBuf::from("output"),
            batch_size: DEFAULT_BATCH_SIZE,
            num_threads: num_cpus::get(),
            significance_level: 0.05,
            top_n: 10,
            fix_same_day: true,
            write_plots: true,
            export_format: None,
            show_progress: true,
            timestamp_formats: TimestampFormats::default(),
        }
    }
}

/// Partial configuration as read from a TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    batch_size: Option<usize>,
    num_threads: Option<usize>,
    significance_level: Option<f64>,
    top_n: Option<usize>,
    fix_same_day: Option<bool>,
    write_plots: Option<bool>,
    export_format: Option<ExportFormat>,
    show_progress: Option<bool>,
    timestamp_formats: Option<Vec<String>>,
}

impl AnalysisConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults overlaid with the values of a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = safe_read_to_string(path, "analysis configuration")?;
        Self::from_toml_str(&contents)
    }

    /// Load defaults overlaid with the values of a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(v) = file.input_path {
            config.input_path = v;
        }
        if let Some(v) = file.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = file.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = file.num_threads {
            config.num_threads = v;
        }
        if let Some(v) = file.significance_level {
            config.significance_level = v;
        }
        if let Some(v) = file.top_n {
            config.top_n = v;
        }
        if let Some(v) = file.fix_same_day {
            config.fix_same_day = v;
        }
        if let Some(v) = file.write_plots {
            config.write_plots = v;
        }
        if file.export_format.is_some() {
            config.export_format = file.export_format;
        }
        if let Some(v) = file.show_progress {
            config.show_progress = v;
        }
        if let Some(formats) = file.timestamp_formats {
            config.timestamp_formats = TimestampFormats::new(formats);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that numeric settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NoShowError::ConfigError("batch_size must be positive".to_string()));
        }
        if self.num_threads == 0 {
            return Err(NoShowError::ConfigError("num_threads must be positive".to_string()));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(NoShowError::ConfigError(format!(
                "significance_level must lie in (0, 1), got {}",
                self.significance_level
            )));
        }
        if self.top_n == 0 {
            return Err(NoShowError::ConfigError("top_n must be positive".to_string()));
        }
        Ok(())
    }

    /// Set the input table
    #[must_use]
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the CSV batch size
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the number of worker threads
    #[must_use]
    pub const fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set the significance level
    #[must_use]
    pub const fn with_significance_level(mut self, level: f64) -> Self {
        self.significance_level = level;
        self
    }

    /// Set the length of top-N listings
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Enable or disable the same-day waiting time fix
    #[must_use]
    pub const fn with_fix_same_day(mut self, enabled: bool) -> Self {
        self.fix_same_day = enabled;
        self
    }

    /// Enable or disable chart rendering
    #[must_use]
    pub const fn with_plots(mut self, enabled: bool) -> Self {
        self.write_plots = enabled;
        self
    }

    /// Export the cleaned dataset
    #[must_use]
    pub const fn with_export_format(mut self, format: Option<ExportFormat>) -> Self {
        self.export_format = format;
        self
    }

    /// Enable or disable the loading spinner
    #[must_use]
    pub const fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Set the fallback timestamp layouts tried after RFC 3339
    #[must_use]
    pub fn with_timestamp_formats(mut self, formats: TimestampFormats) -> Self {
        self.timestamp_formats = formats;
        self
    }
}
