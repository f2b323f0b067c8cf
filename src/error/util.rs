//! Utility functions for error handling
//!
//! File helpers that attach the path and the purpose of the access to IO
//! failures, so a missing input reads as more than "No such file".

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{NoShowError, Result};

/// Open a file for reading, checking that it exists and is a regular file
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(NoShowError::io(
            path,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found (needed for: {purpose})"),
            ),
        ));
    }

    if !path.is_file() {
        return Err(NoShowError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a file (expected a file for: {purpose})"),
            ),
        ));
    }

    fs::File::open(path).map_err(|e| NoShowError::io(path, e))
}

/// Read a whole text file, with the same checks as [`safe_open_file`]
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;
    let mut content = String::new();
    io::Read::read_to_string(&mut file, &mut content).map_err(|e| NoShowError::io(path, e))?;
    Ok(content)
}

/// Create a directory (and parents) for output files
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| NoShowError::io(path, e))
}

/// Create (truncate) a file for writing
pub fn safe_create_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::File::create(path).map_err(|e| NoShowError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_path_and_purpose() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = safe_open_file(&missing, "appointment data").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope.csv"));
        assert!(msg.contains("appointment data"));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = safe_open_file(dir.path(), "appointment data").unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn create_file_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("out.txt");
        safe_create_file(&nested).unwrap();
        assert!(nested.is_file());
    }
}
