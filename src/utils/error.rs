//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading an event log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read event log: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid event log format: {0}")]
    InvalidFormat(String),

    #[error("Malformed interval '{0}'")]
    MalformedInterval(String),
}

/// Errors raised by the aggregation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No events available for {0}")]
    EmptyDataSet(&'static str),

    #[error("Insufficient data: {available} paired templates, top {requested} requested")]
    InsufficientData { available: usize, requested: usize },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur during chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart width {0}px is below the minimum of {1}px")]
    TooNarrow(usize, usize),

    #[error("Chart height must be greater than zero")]
    ZeroHeight,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
