//! Cleaning of loaded appointments
//!
//! Derives the calendar columns, fixes same-day waiting times, counts
//! duplicates, and drops rows with impossible values. Every step is
//! recorded in a [`CleaningReport`].

pub mod filters;

use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::models::Appointment;
use crate::utils::logging::{log_step, log_warning};

pub use filters::{NegativeAgeFilter, NegativeWaitingDaysFilter, RowFilter};

/// Rows removed by one filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    /// Filter name
    pub name: String,
    /// Number of rows the filter dropped
    pub removed: usize,
}

/// What cleaning did to the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    /// Rows before cleaning
    pub input_rows: usize,
    /// Waiting times changed from -1 to 0
    pub same_day_fixed: usize,
    /// Rows identical to an earlier row (counted, not removed)
    pub duplicate_rows: usize,
    /// Per-filter removals in application order
    pub filters: Vec<FilterOutcome>,
    /// Rows after cleaning
    pub output_rows: usize,
    /// Appointments whose patient id already appeared earlier
    pub duplicate_patient_ids: usize,
    /// Appointments whose appointment id already appeared earlier
    pub duplicate_appointment_ids: usize,
}

impl CleaningReport {
    /// Total rows dropped by all filters
    #[must_use]
    pub fn removed_rows(&self) -> usize {
        self.filters.iter().map(|f| f.removed).sum()
    }
}

/// Configurable cleaning pipeline
#[derive(Debug)]
pub struct Cleaner {
    fix_same_day: bool,
    filters: Vec<Box<dyn RowFilter>>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self {
            fix_same_day: true,
            filters: vec![Box::new(NegativeAgeFilter), Box::new(NegativeWaitingDaysFilter)],
        }
    }
}

impl Cleaner {
    /// Create a cleaner with the standard filters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable replacing a -1 day wait with 0
    #[must_use]
    pub const fn with_fix_same_day(mut self, enabled: bool) -> Self {
        self.fix_same_day = enabled;
        self
    }

    /// Append a filter after the standard ones
    #[must_use]
    pub fn with_filter(mut self, filter: Box<dyn RowFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Run all cleaning steps
    pub fn clean(&self, mut appointments: Vec<Appointment>) -> (Vec<Appointment>, CleaningReport) {
        let mut report = CleaningReport {
            input_rows: appointments.len(),
            ..CleaningReport::default()
        };

        for appointment in &mut appointments {
            appointment.derive_calendar_fields();
            if self.fix_same_day && appointment.waiting_days == -1 {
                appointment.waiting_days = 0;
                report.same_day_fixed += 1;
            }
        }
        debug!("Fixed {} same-day waiting times", report.same_day_fixed);

        report.duplicate_rows = count_duplicates(appointments.iter());
        if report.duplicate_rows > 0 {
            log_warning(
                &format!("{} fully duplicated rows found", report.duplicate_rows),
                None,
            );
        }

        for filter in &self.filters {
            debug!(
                "Applying filter '{}' on columns {:?}",
                filter.name(),
                filter.required_columns()
            );
            let before = appointments.len();
            appointments = appointments
                .into_par_iter()
                .filter(|a| filter.keep(a))
                .collect();
            let removed = before - appointments.len();
            log_step(filter.name(), removed, appointments.len());
            report.filters.push(FilterOutcome {
                name: filter.name().to_string(),
                removed,
            });
        }

        report.output_rows = appointments.len();
        report.duplicate_patient_ids = count_duplicates(appointments.iter().map(|a| a.patient_id));
        report.duplicate_appointment_ids =
            count_duplicates(appointments.iter().map(|a| a.appointment_id));
        if report.duplicate_appointment_ids > 0 {
            log_warning(
                &format!(
                    "{} appointment ids occur more than once",
                    report.duplicate_appointment_ids
                ),
                None,
            );
        }

        info!(
            "Cleaning complete: {} of {} rows kept",
            report.output_rows, report.input_rows
        );
        (appointments, report)
    }
}

/// Clean with the standard filters
#[must_use]
pub fn clean(appointments: Vec<Appointment>, fix_same_day: bool) -> (Vec<Appointment>, CleaningReport) {
    Cleaner::new()
        .with_fix_same_day(fix_same_day)
        .clean(appointments)
}

/// Number of items equal to an item seen earlier
fn count_duplicates<T: std::hash::Hash + Eq>(items: impl Iterator<Item = T>) -> usize {
    let mut seen = FxHashSet::default();
    let mut duplicates = 0;
    for item in items {
        if !seen.insert(item) {
            duplicates += 1;
        }
    }
    duplicates
}
