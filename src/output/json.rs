//! JSON output: chart reports and event logs.

use super::prepare_output_path;
use crate::aggregator::{AggregateConfig, ChartSet};
use crate::parser::schema::EventLog;
use crate::utils::config::{DEFAULT_STATS_FILE, SCHEMA_VERSION, STATS_FILE_ENV};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Versioned export of every derived series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Stats file the charts were computed from
    pub source: String,

    pub interval_ms: u64,
    pub top_k: usize,

    /// Timestamp when the report was generated
    pub generated_at: String,

    pub charts: ChartSet,
}

impl ChartReport {
    pub fn new(source: impl Into<String>, config: &AggregateConfig, charts: ChartSet) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            interval_ms: u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
            top_k: config.top_k,
            generated_at: chrono::Utc::now().to_rfc3339(),
            charts,
        }
    }
}

/// Write a chart report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &ChartReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing chart report to: {}", output_path.display());
    write_json(report, output_path)?;
    info!("Report written successfully ({} bytes)", calculate_file_size(output_path));

    Ok(())
}

/// Read a chart report from a JSON file
pub fn read_report(input_path: impl AsRef<Path>) -> Result<ChartReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading chart report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: ChartReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Report loaded: version {}, source {}", report.version, report.source);

    Ok(report)
}

/// Persist an event log in the stats file format
pub fn save_event_log(log: &EventLog, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!(
        "Saving event log ({} events) to: {}",
        log.len(),
        output_path.display()
    );
    write_json(log, output_path)
}

/// Stats file location: `$TEMPLATE_CHARTS_STATS_FILE` or `stats.json`
pub fn default_stats_path() -> PathBuf {
    stats_path_from(std::env::var(STATS_FILE_ENV).ok())
}

/// Stats file location from an optional override; empty means unset
pub fn stats_path_from(value: Option<String>) -> PathBuf {
    match value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_STATS_FILE),
    }
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
