//! Exploratory analysis of the cleaned appointments

pub mod overview;
pub mod questions;

use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::cleaning::CleaningReport;
use crate::config::AnalysisConfig;
use crate::error::{NoShowError, Result};
use crate::models::Appointment;

pub use overview::{DataOverview, DateRange, RepeatPatient};
pub use questions::{
    CategoricalAnalysis, NeighbourhoodRank, NumericAnalysis, SignificanceTest, StatusShare,
    TestKind,
};

/// Everything the analysis produced, in question order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub significance_level: f64,
    pub cleaning: CleaningReport,
    pub overview: DataOverview,
    /// Q1
    pub status: StatusShare,
    /// Q2
    pub age: NumericAnalysis,
    /// Q3
    pub gender: CategoricalAnalysis,
    /// Q4 and Q5, one entry per flag
    pub health_flags: Vec<CategoricalAnalysis>,
    /// Q6
    pub top_neighbourhoods: Vec<NeighbourhoodRank>,
    /// Q7
    pub weekday: CategoricalAnalysis,
    /// Q8
    pub waiting_days: NumericAnalysis,
}

impl AnalysisReport {
    /// Every categorical analysis with its table, in report order
    pub fn categorical(&self) -> impl Iterator<Item = &CategoricalAnalysis> {
        std::iter::once(&self.gender)
            .chain(&self.health_flags)
            .chain(std::iter::once(&self.weekday))
    }

    /// Names of the variables whose test came out significant
    #[must_use]
    pub fn significant_variables(&self) -> Vec<&str> {
        let numeric = [&self.age, &self.waiting_days]
            .into_iter()
            .filter(|a| a.test.is_some_and(|t| t.significant))
            .map(|a| a.table.variable.as_str());
        let categorical = self
            .categorical()
            .filter(|a| a.test.is_some_and(|t| t.significant))
            .map(|a| a.table.variable.as_str());
        numeric.chain(categorical).collect()
    }
}

/// Answer every question for the cleaned appointments
///
/// # Arguments
/// * `appointments` - Cleaned appointments
/// * `cleaning` - Report of the cleaning that produced them
/// * `config` - Significance level and top-N come from here
pub fn analyze(
    appointments: &[Appointment],
    cleaning: &CleaningReport,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    if appointments.is_empty() {
        return Err(NoShowError::validation(
            "No appointments left to analyze after cleaning",
        ));
    }

    let start = Instant::now();
    let alpha = config.significance_level;

    let (age, waiting_days) = rayon::join(
        || questions::age_analysis(appointments, alpha),
        || questions::waiting_analysis(appointments, alpha),
    );

    let report = AnalysisReport {
        significance_level: alpha,
        cleaning: cleaning.clone(),
        overview: overview::overview(appointments, config.top_n)?,
        status: questions::status_share(appointments),
        age,
        gender: questions::gender_analysis(appointments, alpha),
        health_flags: questions::flag_analyses(appointments, alpha),
        top_neighbourhoods: questions::top_neighbourhoods(appointments, config.top_n),
        weekday: questions::weekday_analysis(appointments, alpha),
        waiting_days,
    };

    info!(
        "Analyzed {} appointments in {:?}; significant at {}: {:?}",
        appointments.len(),
        start.elapsed(),
        alpha,
        report.significant_variables()
    );
    Ok(report)
}
