//! Writing analysis results to disk

pub mod export;
pub mod summary;
pub mod tables;

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisReport;
use crate::error::util::{ensure_directory, safe_create_file};
use crate::error::{NoShowError, Result};

pub use export::{CleanedRow, export_cleaned};
pub use summary::render_summary;
pub use tables::{write_summary_csv, write_table_csv, write_tables};

/// Files produced by [`write_report`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub summary: PathBuf,
    pub tables: Vec<PathBuf>,
}

impl AnalysisReport {
    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text summary of every question
    #[must_use]
    pub fn summary(&self) -> String {
        render_summary(self)
    }
}

/// Write a report as JSON
pub fn write_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(safe_create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(|e| NoShowError::io(path, e))
}

/// Write the JSON report, the text summary and every table into `dir`
pub fn write_report(report: &AnalysisReport, dir: &Path) -> Result<ReportFiles> {
    ensure_directory(dir)?;

    let json = dir.join("report.json");
    write_json(report, &json)?;

    let summary = dir.join("summary.txt");
    std::fs::write(&summary, report.summary()).map_err(|e| NoShowError::io(&summary, e))?;

    let tables = write_tables(report, dir)?;
    log::info!(
        "Wrote report, summary and {} tables to {}",
        tables.len(),
        dir.display()
    );

    Ok(ReportFiles {
        json,
        summary,
        tables,
    })
}
