//! Common types used across the appointment models

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NoShowError, Result};

/// Patient gender as recorded on the appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    /// Female gender
    Female,
    /// Male gender
    Male,
}

impl Gender {
    /// The single-letter code used in the source table
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
        }
    }
}

impl TryFrom<&str> for Gender {
    type Error = NoShowError;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "f" | "female" => Ok(Self::Female),
            "m" | "male" => Ok(Self::Male),
            other => Err(NoShowError::validation(format!("Unknown gender '{other}'"))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether the patient attended the appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AppointmentStatus {
    /// The patient showed up (`No-show` = "No")
    Showed,
    /// The patient did not show up (`No-show` = "Yes")
    NoShow,
}

impl AppointmentStatus {
    /// Both statuses in table column order
    pub const ALL: [Self; 2] = [Self::Showed, Self::NoShow];

    /// Column position in a contingency table
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Showed => 0,
            Self::NoShow => 1,
        }
    }

    /// Human readable label used in reports and chart legends
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Showed => "Showed up",
            Self::NoShow => "No-show",
        }
    }

    /// Value of the `No-show` column in the source table
    #[must_use]
    pub const fn source_value(self) -> &'static str {
        match self {
            Self::Showed => "No",
            Self::NoShow => "Yes",
        }
    }

    /// Convenience predicate
    #[must_use]
    pub const fn is_no_show(self) -> bool {
        matches!(self, Self::NoShow)
    }
}

impl TryFrom<&str> for AppointmentStatus {
    type Error = NoShowError;

    fn try_from(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "no" => Ok(Self::Showed),
            "yes" => Ok(Self::NoShow),
            other => Err(NoShowError::validation(format!(
                "Unknown No-show value '{other}' (expected Yes or No)"
            ))),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
