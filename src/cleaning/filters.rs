//! Row filters applied during cleaning
//!
//! Each filter decides per appointment whether the row is kept. Filters
//! are applied in sequence and the number of rows each one removes is
//! recorded in the cleaning report.

use std::fmt::Debug;

use crate::models::Appointment;

/// A rule that keeps or drops individual appointments
pub trait RowFilter: Debug + Send + Sync {
    /// Short description used in logs and the cleaning report
    fn name(&self) -> &str;

    /// Whether the appointment passes the filter
    fn keep(&self, appointment: &Appointment) -> bool;

    /// Columns (after renaming) the filter reads
    fn required_columns(&self) -> Vec<&'static str>;
}

/// Drops rows with a negative age
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeAgeFilter;

impl RowFilter for NegativeAgeFilter {
    fn name(&self) -> &str {
        "negative age"
    }

    fn keep(&self, appointment: &Appointment) -> bool {
        appointment.age >= 0
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec!["age"]
    }
}

/// Drops rows whose appointment lies before the day it was scheduled
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeWaitingDaysFilter;

impl RowFilter for NegativeWaitingDaysFilter {
    fn name(&self) -> &str {
        "negative waiting days"
    }

    fn keep(&self, appointment: &Appointment) -> bool {
        appointment.waiting_days >= 0
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec!["waiting_days"]
    }
}
