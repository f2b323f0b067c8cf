//! Contingency tables of a categorical column against appointment status

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Appointment, AppointmentStatus};

/// Counts for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyRow {
    /// Category label
    pub label: String,
    /// Appointments attended
    pub showed: u64,
    /// Appointments missed
    pub no_show: u64,
}

impl ContingencyRow {
    /// Counts in status column order
    #[must_use]
    pub const fn counts(&self) -> [u64; 2] {
        [self.showed, self.no_show]
    }

    /// Appointments in this category
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.showed + self.no_show
    }

    /// Share of attended and missed appointments within the row
    #[must_use]
    pub fn proportions(&self) -> [f64; 2] {
        let total = self.total();
        if total == 0 {
            return [0.0, 0.0];
        }
        [
            self.showed as f64 / total as f64,
            self.no_show as f64 / total as f64,
        ]
    }
}

/// A category-by-status cross tabulation
///
/// Rows appear in the order of the grouping key and only categories that
/// occur in the data get a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    /// Name of the grouping column
    pub variable: String,
    pub rows: Vec<ContingencyRow>,
}

impl ContingencyTable {
    /// Cross-tabulate appointments by a key against their status
    ///
    /// # Arguments
    /// * `variable` - Name of the grouping column
    /// * `appointments` - Rows to count
    /// * `key` - Grouping key; its ordering decides the row order
    /// * `label` - Display label for a key
    pub fn from_appointments<K, F, L>(
        variable: &str,
        appointments: &[Appointment],
        key: F,
        label: L,
    ) -> Self
    where
        K: Ord,
        F: Fn(&Appointment) -> K,
        L: Fn(&K) -> String,
    {
        let mut counts: BTreeMap<K, [u64; 2]> = BTreeMap::new();
        for appointment in appointments {
            counts.entry(key(appointment)).or_insert([0, 0])[appointment.status.index()] += 1;
        }

        let rows = counts
            .into_iter()
            .map(|(k, [showed, no_show])| ContingencyRow {
                label: label(&k),
                showed,
                no_show,
            })
            .collect();

        Self {
            variable: variable.to_string(),
            rows,
        }
    }

    /// Column labels in status order
    #[must_use]
    pub fn column_labels() -> [&'static str; 2] {
        AppointmentStatus::ALL.map(AppointmentStatus::label)
    }

    /// Row for a category label
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&ContingencyRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Appointments per status
    #[must_use]
    pub fn column_totals(&self) -> [u64; 2] {
        self.rows.iter().fold([0, 0], |acc, row| {
            [acc[0] + row.showed, acc[1] + row.no_show]
        })
    }

    /// All appointments in the table
    #[must_use]
    pub fn total(&self) -> u64 {
        self.column_totals().iter().sum()
    }

    /// Observed counts as a matrix
    #[must_use]
    pub fn observed(&self) -> Vec<Vec<u64>> {
        self.rows.iter().map(|r| r.counts().to_vec()).collect()
    }

    /// Row-normalized shares, one pair per row
    #[must_use]
    pub fn row_proportions(&self) -> Vec<[f64; 2]> {
        self.rows.iter().map(ContingencyRow::proportions).collect()
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
