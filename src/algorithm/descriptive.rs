//! Descriptive statistics for numeric columns

use serde::Serialize;

use crate::error::{NoShowError, Result};
use crate::models::{Appointment, AppointmentStatus, HealthFlag};

/// Summary of one numeric column, in the layout of a `describe` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name
    pub name: String,
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); NaN for a single value
    pub std: f64,
    pub min: f64,
    /// 25th percentile
    pub q25: f64,
    /// Median
    pub q50: f64,
    /// 75th percentile
    pub q75: f64,
    pub max: f64,
}

/// Calculate the mean of a slice of values
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with an n - 1 denominator
#[must_use]
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Quantile of sorted data by linear interpolation between closest ranks
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Summarize a column of values
pub fn describe(name: &str, values: &[f64]) -> Result<ColumnSummary> {
    if values.is_empty() {
        return Err(NoShowError::statistics(format!(
            "Cannot describe empty column {name}"
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(NoShowError::statistics(format!(
            "Column {name} contains non-finite values"
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(values);
    Ok(ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean,
        std: sample_variance(values, mean).sqrt(),
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Summaries of every numeric column of the cleaned table
pub fn describe_table(appointments: &[Appointment]) -> Result<Vec<ColumnSummary>> {
    let mut columns: Vec<(&str, Vec<f64>)> = vec![
        ("age", appointments.iter().map(|a| a.age as f64).collect()),
        (
            "waiting_days",
            appointments.iter().map(|a| a.waiting_days as f64).collect(),
        ),
    ];
    for flag in HealthFlag::ALL {
        columns.push((
            flag.column(),
            appointments
                .iter()
                .map(|a| f64::from(flag.level(a)))
                .collect(),
        ));
    }

    columns
        .iter()
        .map(|(name, values)| describe(name, values))
        .collect()
}

/// Values of one column split by appointment status
#[must_use]
pub fn split_by_status<F>(appointments: &[Appointment], value: F) -> (Vec<f64>, Vec<f64>)
where
    F: Fn(&Appointment) -> f64,
{
    let mut showed = Vec::new();
    let mut no_show = Vec::new();
    for appointment in appointments {
        match appointment.status {
            AppointmentStatus::Showed => showed.push(value(appointment)),
            AppointmentStatus::NoShow => no_show.push(value(appointment)),
        }
    }
    (showed, no_show)
}

/// Mean of a column per appointment status
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusMeans {
    pub showed: f64,
    pub no_show: f64,
}

/// Mean of a column for patients who showed up and for no-shows
#[must_use]
pub fn mean_by_status<F>(appointments: &[Appointment], value: F) -> StatusMeans
where
    F: Fn(&Appointment) -> f64,
{
    let (showed, no_show) = split_by_status(appointments, value);
    StatusMeans {
        showed: mean(&showed),
        no_show: mean(&no_show),
    }
}
