//! Output writers for chart pages, reports and event logs.
//!
//! This module handles writing data to disk in various formats:
//! - HTML chart pages (or single SVG charts)
//! - JSON chart reports
//! - Stats files in the scanner's event log format

pub mod json;
pub mod page;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use json::{
    default_stats_path, read_report, save_event_log, stats_path_from, write_report, ChartReport,
};
pub use page::write_page;

/// Validate that an output path is writable and create missing parents
///
/// # Errors
/// * `OutputError::InvalidPath` - empty path, existing directory, or
///   parent directory that cannot be created
pub fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
