//! The eight research questions about no-show behaviour
//!
//! Each function answers one question from the cleaned appointments and
//! returns a serializable result. Tests that cannot be computed on the data
//! at hand (a single category, a status with fewer than two rows) are
//! logged and reported as `None` rather than failing the whole analysis.

use chrono::Weekday;
use itertools::Itertools;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::algorithm::contingency::ContingencyTable;
use crate::algorithm::descriptive::{StatusMeans, mean_by_status, split_by_status};
use crate::algorithm::hypothesis::{ChiSquareResult, TTestResult, ttest_ind};
use crate::error::Result;
use crate::models::{Appointment, AppointmentStatus, HealthFlag};
use crate::utils::date::weekday_name;
use crate::utils::logging::log_warning;

/// Which test produced a [`SignificanceTest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    ChiSquare,
    StudentT,
}

/// A test result classified against the significance level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceTest {
    pub kind: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    /// `p_value <= alpha`
    pub significant: bool,
}

impl SignificanceTest {
    /// Classify a chi-square result
    #[must_use]
    pub fn chi_square(result: &ChiSquareResult, alpha: f64) -> Self {
        Self {
            kind: TestKind::ChiSquare,
            statistic: result.statistic,
            p_value: result.p_value,
            degrees_of_freedom: result.dof as f64,
            significant: result.is_significant(alpha),
        }
    }

    /// Classify a t-test result
    #[must_use]
    pub fn t_test(result: &TTestResult, alpha: f64) -> Self {
        Self {
            kind: TestKind::StudentT,
            statistic: result.statistic,
            p_value: result.p_value,
            degrees_of_freedom: result.df,
            significant: result.is_significant(alpha),
        }
    }
}

// Skipped tests are logged, not fatal
fn optional_test<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log_warning(&format!("Skipping test for {what}: {e}"), None);
            None
        }
    }
}

fn chi_square_of(table: &ContingencyTable, alpha: f64) -> Option<SignificanceTest> {
    optional_test(&table.variable, table.chi_square())
        .map(|result| SignificanceTest::chi_square(&result, alpha))
}

fn t_test_of<F>(what: &str, appointments: &[Appointment], value: F, alpha: f64) -> Option<SignificanceTest>
where
    F: Fn(&Appointment) -> f64,
{
    let (showed, no_show) = split_by_status(appointments, value);
    optional_test(what, ttest_ind(&showed, &no_show))
        .map(|result| SignificanceTest::t_test(&result, alpha))
}

/// Q1: share of attended and missed appointments
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusShare {
    pub showed: u64,
    pub no_show: u64,
    pub showed_share: f64,
    pub no_show_share: f64,
}

/// Q1: how many appointments were missed
#[must_use]
pub fn status_share(appointments: &[Appointment]) -> StatusShare {
    let no_show = appointments.iter().filter(|a| a.is_no_show()).count() as u64;
    let showed = appointments.len() as u64 - no_show;
    let total = appointments.len().max(1) as f64;
    StatusShare {
        showed,
        no_show,
        showed_share: showed as f64 / total,
        no_show_share: no_show as f64 / total,
    }
}

/// A categorical column against status, with its chi-square test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalAnalysis {
    pub table: ContingencyTable,
    pub test: Option<SignificanceTest>,
}

/// A numeric column against status, with per-status means and a t-test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericAnalysis {
    /// Counts per distinct value
    pub table: ContingencyTable,
    pub means: StatusMeans,
    pub test: Option<SignificanceTest>,
}

fn numeric_analysis<F>(
    variable: &str,
    appointments: &[Appointment],
    value: F,
    alpha: f64,
) -> NumericAnalysis
where
    F: Fn(&Appointment) -> i64 + Copy,
{
    NumericAnalysis {
        table: ContingencyTable::from_appointments(variable, appointments, value, i64::to_string),
        means: mean_by_status(appointments, |a| value(a) as f64),
        test: t_test_of(variable, appointments, |a| value(a) as f64, alpha),
    }
}

/// Q2: does age relate to missing the appointment
#[must_use]
pub fn age_analysis(appointments: &[Appointment], alpha: f64) -> NumericAnalysis {
    numeric_analysis("age", appointments, |a| a.age, alpha)
}

/// Q3: does gender relate to missing the appointment
#[must_use]
pub fn gender_analysis(appointments: &[Appointment], alpha: f64) -> CategoricalAnalysis {
    let table =
        ContingencyTable::from_appointments("gender", appointments, |a| a.gender, |g| g.to_string());
    let test = chi_square_of(&table, alpha);
    CategoricalAnalysis { table, test }
}

/// Q4 and Q5: one table and test per health or welfare flag
#[must_use]
pub fn flag_analyses(appointments: &[Appointment], alpha: f64) -> Vec<CategoricalAnalysis> {
    HealthFlag::ALL
        .par_iter()
        .map(|flag| {
            let table = ContingencyTable::from_appointments(
                flag.column(),
                appointments,
                |a| flag.level(a),
                u8::to_string,
            );
            let test = chi_square_of(&table, alpha);
            CategoricalAnalysis { table, test }
        })
        .collect()
}

/// One neighbourhood ranked by missed appointments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighbourhoodRank {
    pub name: String,
    pub no_show: u64,
    /// All appointments in the neighbourhood
    pub total: u64,
    /// Missed share within the neighbourhood
    pub no_show_rate: f64,
    /// Share of the no-shows among the ranked neighbourhoods
    pub share_of_top: f64,
}

/// Q6: neighbourhoods with the most missed appointments
#[must_use]
pub fn top_neighbourhoods(appointments: &[Appointment], limit: usize) -> Vec<NeighbourhoodRank> {
    let mut counts: FxHashMap<&str, [u64; 2]> = FxHashMap::default();
    for appointment in appointments {
        let entry = counts
            .entry(appointment.neighbourhood.as_str())
            .or_insert([0, 0]);
        entry[appointment.status.index()] += 1;
    }

    let no_show_idx = AppointmentStatus::NoShow.index();
    let ranked: Vec<(&str, [u64; 2])> = counts
        .into_iter()
        .filter(|(_, c)| c[no_show_idx] > 0)
        .sorted_by(|a, b| b.1[no_show_idx].cmp(&a.1[no_show_idx]).then(a.0.cmp(b.0)))
        .take(limit)
        .collect();

    let top_total: u64 = ranked.iter().map(|(_, c)| c[no_show_idx]).sum();
    ranked
        .into_iter()
        .map(|(name, counts)| {
            let total = counts.iter().sum::<u64>();
            let no_show = counts[no_show_idx];
            NeighbourhoodRank {
                name: name.to_string(),
                no_show,
                total,
                no_show_rate: no_show as f64 / total as f64,
                share_of_top: no_show as f64 / top_total as f64,
            }
        })
        .collect()
}

/// Q7: does the weekday relate to missing the appointment
///
/// Rows run Monday to Sunday; days without appointments are left out.
#[must_use]
pub fn weekday_analysis(appointments: &[Appointment], alpha: f64) -> CategoricalAnalysis {
    let table = ContingencyTable::from_appointments(
        "weekday",
        appointments,
        |a| a.weekday.num_days_from_monday(),
        |day| weekday_name(weekday_from_index(*day)).to_string(),
    );
    let test = chi_square_of(&table, alpha);
    CategoricalAnalysis { table, test }
}

fn weekday_from_index(day: u32) -> Weekday {
    match day {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Q8: does the waiting time relate to missing the appointment
#[must_use]
pub fn waiting_analysis(appointments: &[Appointment], alpha: f64) -> NumericAnalysis {
    numeric_analysis("waiting_days", appointments, |a| a.waiting_days, alpha)
}
