//! CSV output of contingency tables and column summaries

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::algorithm::contingency::ContingencyTable;
use crate::algorithm::descriptive::ColumnSummary;
use crate::analysis::AnalysisReport;
use crate::error::util::safe_create_file;
use crate::error::{NoShowError, Result};

/// Quote a CSV field when it contains a separator, quote or newline
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write counts and row proportions of one table
pub fn write_table_csv(table: &ContingencyTable, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(safe_create_file(path)?);
    let to_err = |e| NoShowError::io(path, e);

    let [showed, no_show] = ContingencyTable::column_labels();
    writeln!(
        writer,
        "{},{showed},{no_show},{showed} share,{no_show} share",
        escape_csv(&table.variable)
    )
    .map_err(to_err)?;

    for row in &table.rows {
        let [showed_share, no_show_share] = row.proportions();
        writeln!(
            writer,
            "{},{},{},{showed_share:.6},{no_show_share:.6}",
            escape_csv(&row.label),
            row.showed,
            row.no_show
        )
        .map_err(to_err)?;
    }
    writer.flush().map_err(to_err)
}

/// Write the numeric column summaries
pub fn write_summary_csv(columns: &[ColumnSummary], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(safe_create_file(path)?);
    let to_err = |e| NoShowError::io(path, e);

    writeln!(writer, "column,count,mean,std,min,25%,50%,75%,max").map_err(to_err)?;
    for c in columns {
        writeln!(
            writer,
            "{},{},{:.6},{:.6},{},{},{},{},{}",
            escape_csv(&c.name),
            c.count,
            c.mean,
            c.std,
            c.min,
            c.q25,
            c.q50,
            c.q75,
            c.max
        )
        .map_err(to_err)?;
    }
    writer.flush().map_err(to_err)
}

/// Write every table of the report into `dir`
///
/// Returns the paths written, one `crosstab_<variable>.csv` per table plus
/// `describe.csv`.
pub fn write_tables(report: &AnalysisReport, dir: &Path) -> Result<Vec<PathBuf>> {
    let tables = [&report.age.table, &report.waiting_days.table]
        .into_iter()
        .chain(report.categorical().map(|a| &a.table));

    let mut written = Vec::new();
    for table in tables {
        let path = dir.join(format!("crosstab_{}.csv", table.variable));
        write_table_csv(table, &path)?;
        written.push(path);
    }

    let path = dir.join("describe.csv");
    write_summary_csv(&report.overview.columns, &path)?;
    written.push(path);

    Ok(written)
}
