//! End-to-end analysis run: load, clean, analyze and write outputs

use std::path::PathBuf;
use std::time::Instant;

use log::info;

use crate::analysis::{AnalysisReport, analyze};
use crate::cleaning::Cleaner;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::load_appointments;
use crate::plot::write_charts;
use crate::report::{ReportFiles, export_cleaned, write_report};

/// Outputs of a finished run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: AnalysisReport,
    pub files: ReportFiles,
    /// Cleaned dataset, when an export format was configured
    pub export: Option<PathBuf>,
    pub charts: Vec<PathBuf>,
}

/// Run the whole analysis inside a thread pool sized from `config`
pub fn run(config: &AnalysisConfig) -> Result<RunOutput> {
    config.validate()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()?;
    pool.install(|| run_in_pool(config))
}

fn run_in_pool(config: &AnalysisConfig) -> Result<RunOutput> {
    let start = Instant::now();
    info!(
        "Starting no-show analysis of {} with {} threads",
        config.input_path.display(),
        config.num_threads
    );

    let appointments = load_appointments(config)?;
    let (appointments, cleaning) = Cleaner::new()
        .with_fix_same_day(config.fix_same_day)
        .clean(appointments);

    let report = analyze(&appointments, &cleaning, config)?;
    let files = write_report(&report, &config.output_dir)?;

    let export = match config.export_format {
        Some(format) => export_cleaned(&appointments, &config.output_dir, format)?,
        None => None,
    };

    let charts = if config.write_plots {
        write_charts(&report, &appointments, &config.output_dir)?
    } else {
        Vec::new()
    };

    info!("Analysis finished in {:?}", start.elapsed());
    Ok(RunOutput {
        report,
        files,
        export,
        charts,
    })
}
