//! Logging utilities
//!
//! Standardized log lines for file operations and cleaning steps.

use std::path::Path;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense verb describing what was done
/// * `path` - Path of the file or directory that was operated on
/// * `items` - Number of rows or files processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} rows at {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        ),
        None => log::info!(
            "Successfully {} {} rows at {}",
            operation,
            items,
            path.display()
        ),
    }
}

/// Log the outcome of one cleaning step
pub fn log_step(step: &str, removed: usize, remaining: usize) {
    if removed == 0 {
        log::debug!("{step}: nothing removed ({remaining} rows)");
    } else {
        log::info!("{step}: removed {removed} rows, {remaining} remain");
    }
}

/// Log an operation warning with consistent format
///
/// # Arguments
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
