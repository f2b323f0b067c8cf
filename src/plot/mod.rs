//! SVG charts for the analysis report

pub mod charts;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::algorithm::descriptive::split_by_status;
use crate::analysis::AnalysisReport;
use crate::error::util::ensure_directory;
use crate::error::{NoShowError, Result};
use crate::models::{Appointment, AppointmentStatus};
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub use charts::{NO_SHOW_COLOR, SHOWED_COLOR};

const AGE_BIN_WIDTH: f64 = 5.0;
const WAITING_BIN_WIDTH: f64 = 7.0;

fn render(path: PathBuf, draw: impl FnOnce(&Path) -> charts::ChartResult) -> Result<PathBuf> {
    draw(&path).map_err(|e| NoShowError::PlotError(format!("{}: {e}", path.display())))?;
    log::debug!("Wrote chart {}", path.display());
    Ok(path)
}

/// Appointments per waiting time, in days
fn counts_by_waiting_days(appointments: &[Appointment]) -> Vec<(i64, [u64; 2])> {
    let mut counts: BTreeMap<i64, [u64; 2]> = BTreeMap::new();
    for a in appointments {
        counts.entry(a.waiting_days).or_insert([0, 0])[a.status.index()] += 1;
    }
    counts.into_iter().collect()
}

/// Render every chart into `dir/charts`
///
/// # Arguments
/// * `report` - Finished analysis
/// * `appointments` - Cleaned appointments behind the report
/// * `dir` - Output directory; charts land in its `charts` subdirectory
pub fn write_charts(
    report: &AnalysisReport,
    appointments: &[Appointment],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let start = Instant::now();
    let dir = dir.join("charts");
    ensure_directory(&dir)?;
    log_operation_start("Rendering charts into", &dir);

    let mut written = Vec::new();

    let status_labels: Vec<String> = AppointmentStatus::ALL
        .iter()
        .map(|s| s.label().to_string())
        .collect();
    written.push(render(dir.join("status_share.svg"), |p| {
        charts::category_bars(
            p,
            "Appointment status",
            &status_labels,
            &[report.status.showed_share, report.status.no_show_share],
            "share of appointments",
            SHOWED_COLOR,
        )
    })?);

    for analysis in report.categorical() {
        let table = &analysis.table;
        written.push(render(
            dir.join(format!("proportions_{}.svg", table.variable)),
            |p| charts::stacked_proportions(p, &format!("Appointment status by {}", table.variable), table),
        )?);
    }
    written.push(render(dir.join("proportions_age.svg"), |p| {
        charts::stacked_proportions(p, "Appointment status by age", &report.age.table)
    })?);

    let (showed_ages, no_show_ages) = split_by_status(appointments, |a| a.age as f64);
    written.push(render(dir.join("histogram_age.svg"), |p| {
        charts::overlaid_histogram(
            p,
            "Age distribution",
            "age",
            &showed_ages,
            &no_show_ages,
            AGE_BIN_WIDTH,
        )
    })?);

    let (showed_waits, no_show_waits) = split_by_status(appointments, |a| a.waiting_days as f64);
    written.push(render(dir.join("histogram_waiting_days.svg"), |p| {
        charts::overlaid_histogram(
            p,
            "Waiting days distribution",
            "waiting days",
            &showed_waits,
            &no_show_waits,
            WAITING_BIN_WIDTH,
        )
    })?);

    written.push(render(dir.join("weekday_counts.svg"), |p| {
        charts::status_lines(p, "Appointments per weekday", &report.weekday.table)
    })?);

    let waiting_counts = counts_by_waiting_days(appointments);
    written.push(render(dir.join("waiting_days.svg"), |p| {
        charts::grouped_counts(p, "Appointments per waiting time", "waiting days", &waiting_counts)
    })?);

    if !report.top_neighbourhoods.is_empty() {
        let names: Vec<String> = report
            .top_neighbourhoods
            .iter()
            .map(|n| n.name.clone())
            .collect();
        let counts: Vec<f64> = report
            .top_neighbourhoods
            .iter()
            .map(|n| n.no_show as f64)
            .collect();
        written.push(render(dir.join("top_neighbourhoods.svg"), |p| {
            charts::category_bars(
                p,
                "Neighbourhoods with the most no-shows",
                &names,
                &counts,
                "no-show appointments",
                NO_SHOW_COLOR,
            )
        })?);
    }

    log_operation_complete("rendered", &dir, written.len(), Some(start.elapsed()));
    Ok(written)
}
