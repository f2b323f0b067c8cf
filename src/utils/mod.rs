//! Shared helpers: timestamp handling and logging/progress output.

pub mod date;
pub mod logging;

/// Default number of rows per record batch when reading CSV input
pub const DEFAULT_BATCH_SIZE: usize = 16384;
