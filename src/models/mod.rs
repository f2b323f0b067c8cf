//! Domain models for appointment records
//!
//! This module contains the typed appointment record, the raw row it is
//! coerced from, and the small enums used to group appointments.

pub mod appointment;
pub mod flags;
pub mod types;

// Re-export commonly used types
pub use appointment::{Appointment, RawAppointment};
pub use flags::HealthFlag;
pub use types::{AppointmentStatus, Gender};
