//! Event log parsing and schema definitions.
//!
//! This module handles:
//! - Reading stats files into an `EventLog`
//! - Validating start/end pairing
//! - Parsing bucketing intervals

pub mod event_log;
pub mod interval;
pub mod schema;

// Re-export main types
pub use event_log::{load_event_log, parse_event_log, validate_event_log, LogDiagnostics};
pub use interval::{interval_or_default, parse_interval};
pub use schema::{Event, EventKind, EventLog};
