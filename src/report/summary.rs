//! Plain-text rendering of an [`AnalysisReport`]

use crate::algorithm::contingency::ContingencyTable;
use crate::analysis::{AnalysisReport, CategoricalAnalysis, NumericAnalysis, SignificanceTest};
use crate::models::HealthFlag;

/// Truncate a label to `max_len` characters, marking the cut with `...`
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn describe_test(test: Option<&SignificanceTest>) -> String {
    match test {
        Some(t) => format!(
            "statistic {:.4}, dof {}, p-value {:.4e} ({})",
            t.statistic,
            t.degrees_of_freedom,
            t.p_value,
            if t.significant {
                "significant"
            } else {
                "not significant"
            }
        ),
        None => "not computed".to_string(),
    }
}

fn table_to_string(table: &ContingencyTable) -> String {
    let [showed_label, no_show_label] = ContingencyTable::column_labels();
    let mut output = format!(
        "{:<24} | {:>9} | {:>9} | {:>9} | {:>9}\n\
         -------------------------|-----------|-----------|-----------|----------\n",
        truncate_string(&table.variable, 24),
        showed_label,
        no_show_label,
        "Showed %",
        "No-show %"
    );
    for row in &table.rows {
        let [showed_share, no_show_share] = row.proportions();
        output.push_str(&format!(
            "{:<24} | {:>9} | {:>9} | {:>8.2}% | {:>8.2}%\n",
            truncate_string(&row.label, 24),
            row.showed,
            row.no_show,
            100.0 * showed_share,
            100.0 * no_show_share
        ));
    }
    output
}

fn categorical_section(title: &str, analysis: &CategoricalAnalysis) -> String {
    format!(
        "{title}\n{}Chi-square: {}\n\n",
        table_to_string(&analysis.table),
        describe_test(analysis.test.as_ref())
    )
}

// Numeric tables have one row per distinct value, so only the means and test are shown
fn numeric_section(title: &str, analysis: &NumericAnalysis) -> String {
    format!(
        "{title}\n\
         - Mean ({}): {:.2}\n\
         - Mean ({}): {:.2}\n\
         - t-test: {}\n\n",
        ContingencyTable::column_labels()[0],
        analysis.means.showed,
        ContingencyTable::column_labels()[1],
        analysis.means.no_show,
        describe_test(analysis.test.as_ref())
    )
}

/// Render the full report as text
#[must_use]
pub fn render_summary(report: &AnalysisReport) -> String {
    let mut output = String::new();
    let overview = &report.overview;
    let cleaning = &report.cleaning;

    output.push_str(&format!(
        "Data Summary:\n\
         - Rows loaded: {}\n\
         - Rows after cleaning: {} ({} removed)\n\
         - Same-day waiting times fixed: {}\n\
         - Fully duplicated rows: {}\n\
         - Repeated patient ids: {}\n\
         - Repeated appointment ids: {}\n\
         - Distinct patients: {}\n\
         - Distinct neighbourhoods: {}\n",
        cleaning.input_rows,
        cleaning.output_rows,
        cleaning.removed_rows(),
        cleaning.same_day_fixed,
        cleaning.duplicate_rows,
        cleaning.duplicate_patient_ids,
        cleaning.duplicate_appointment_ids,
        overview.patients,
        overview.neighbourhoods
    ));
    for filter in &cleaning.filters {
        output.push_str(&format!("  - {}: {} removed\n", filter.name, filter.removed));
    }
    if let Some(range) = &overview.scheduled {
        output.push_str(&format!(
            "- Scheduled days: {} to {}\n",
            range.first, range.last
        ));
    }
    if let Some(range) = &overview.appointments {
        output.push_str(&format!(
            "- Appointment days: {} to {}\n",
            range.first.date(),
            range.last.date()
        ));
    }
    output.push('\n');

    output.push_str(
        "Column                   |     Count |      Mean |       Std |       Min |       25% |       50% |       75% |       Max\n\
         -------------------------|-----------|-----------|-----------|-----------|-----------|-----------|-----------|----------\n",
    );
    for column in &overview.columns {
        output.push_str(&format!(
            "{:<24} | {:>9} | {:>9.3} | {:>9.3} | {:>9.2} | {:>9.2} | {:>9.2} | {:>9.2} | {:>9.2}\n",
            truncate_string(&column.name, 24),
            column.count,
            column.mean,
            column.std,
            column.min,
            column.q25,
            column.q50,
            column.q75,
            column.max
        ));
    }
    output.push('\n');

    if !overview.repeat_patients.is_empty() {
        output.push_str("Most frequent patients:\n");
        for patient in &overview.repeat_patients {
            output.push_str(&format!(
                "  {:>16} | {} appointments\n",
                patient.patient_id, patient.total_appointments
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Q1 Appointment status:\n\
         - Showed up: {} ({:.2}%)\n\
         - No-show: {} ({:.2}%)\n\n",
        report.status.showed,
        100.0 * report.status.showed_share,
        report.status.no_show,
        100.0 * report.status.no_show_share
    ));

    output.push_str(&numeric_section("Q2 Age", &report.age));
    output.push_str(&categorical_section("Q3 Gender", &report.gender));
    for (flag, analysis) in HealthFlag::ALL.iter().zip(&report.health_flags) {
        output.push_str(&categorical_section(
            &format!("Q4/Q5 {}", flag.label()),
            analysis,
        ));
    }

    output.push_str("Q6 Neighbourhoods with the most no-shows:\n");
    for (rank, hood) in report.top_neighbourhoods.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}. {:<30} | {:>6} no-shows | {:>6.2}% of its appointments | {:>6.2}% of top\n",
            rank + 1,
            truncate_string(&hood.name, 30),
            hood.no_show,
            100.0 * hood.no_show_rate,
            100.0 * hood.share_of_top
        ));
    }
    output.push('\n');

    output.push_str(&categorical_section("Q7 Weekday", &report.weekday));
    output.push_str(&numeric_section("Q8 Waiting days", &report.waiting_days));

    let significant = report.significant_variables();
    output.push_str(&format!(
        "Significant at {}: {}\n",
        report.significance_level,
        if significant.is_empty() {
            "none".to_string()
        } else {
            significant.join(", ")
        }
    ));

    output
}
