//! Event log loading and validation.
//!
//! Reads the stats JSON written by the scanner into an [`EventLog`] and
//! reports structural problems (unmatched ids, misplaced markers) without
//! rejecting the log. Only the duration ranking needs paired ids; every
//! other aggregation works on whatever is present.

use super::schema::{Event, EventKind, EventLog};
use crate::utils::error::ParseError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Parse an event log from a JSON string
///
/// # Errors
/// * `ParseError::JsonError` - Invalid JSON or missing required event fields
pub fn parse_event_log(json: &str) -> Result<EventLog, ParseError> {
    let log: EventLog = serde_json::from_str(json)?;

    debug!(
        "Parsed event log: {} start events, {} end events, concurrency {}",
        log.starts.len(),
        log.ends.len(),
        log.concurrency
    );

    Ok(log)
}

/// Load an event log from a stats file
///
/// # Errors
/// * `ParseError::IoError` - File cannot be read
/// * `ParseError::JsonError` - File is not a valid stats record
/// * `ParseError::InvalidFormat` - File is empty
pub fn load_event_log(path: impl AsRef<Path>) -> Result<EventLog, ParseError> {
    let path = path.as_ref();

    info!("Loading event log from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "{} is empty",
            path.display()
        )));
    }

    parse_event_log(&contents)
}

/// Structural report about an event log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogDiagnostics {
    pub start_events: usize,
    pub end_events: usize,
    pub unique_ids: usize,
    pub categories: BTreeSet<String>,

    /// Ids that started but never finished
    pub unmatched_starts: Vec<String>,

    /// Ids that finished without a recorded start
    pub unmatched_ends: Vec<String>,

    /// Events whose kind disagrees with the sequence holding them
    pub misplaced_events: usize,

    /// Ids with more than one START or more than one END
    pub duplicate_ids: Vec<String>,

    /// Earliest and latest timestamp across both sequences
    pub span: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl LogDiagnostics {
    /// True when every id has exactly one START and one END in the right place
    pub fn is_well_formed(&self) -> bool {
        self.unmatched_starts.is_empty()
            && self.unmatched_ends.is_empty()
            && self.misplaced_events == 0
            && self.duplicate_ids.is_empty()
    }

    /// Milliseconds between the first and last event
    pub fn span_millis(&self) -> i64 {
        self.span
            .map(|(first, last)| (last - first).num_milliseconds())
            .unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        format!(
            "Starts: {} | Ends: {} | Ids: {} | Categories: {} | Unmatched: {} | Span: {}ms",
            self.start_events,
            self.end_events,
            self.unique_ids,
            self.categories.len(),
            self.unmatched_starts.len() + self.unmatched_ends.len(),
            self.span_millis()
        )
    }
}

#[derive(Default)]
struct IdTally {
    starts: usize,
    ends: usize,
}

/// Inspect an event log for pairing and placement problems
///
/// Never fails; id lists come back in first-encounter order.
pub fn validate_event_log(log: &EventLog) -> LogDiagnostics {
    let mut order: Vec<&str> = Vec::new();
    let mut tally: HashMap<&str, IdTally> = HashMap::new();

    for event in &log.starts {
        let entry = tally.entry(event.id.as_str()).or_insert_with(|| {
            order.push(event.id.as_str());
            IdTally::default()
        });
        entry.starts += 1;
    }
    for event in &log.ends {
        let entry = tally.entry(event.id.as_str()).or_insert_with(|| {
            order.push(event.id.as_str());
            IdTally::default()
        });
        entry.ends += 1;
    }

    let mut diagnostics = LogDiagnostics {
        start_events: log.starts.len(),
        end_events: log.ends.len(),
        unique_ids: order.len(),
        ..Default::default()
    };

    for id in order {
        let counts = &tally[&id];
        if counts.ends == 0 {
            diagnostics.unmatched_starts.push(id.to_string());
        }
        if counts.starts == 0 {
            diagnostics.unmatched_ends.push(id.to_string());
        }
        if counts.starts > 1 || counts.ends > 1 {
            diagnostics.duplicate_ids.push(id.to_string());
        }
    }

    diagnostics.misplaced_events = count_misplaced(&log.starts, EventKind::Start)
        + count_misplaced(&log.ends, EventKind::End);

    diagnostics.categories = log
        .starts
        .iter()
        .chain(log.ends.iter())
        .map(|e| e.category.clone())
        .collect();

    diagnostics.span = log
        .starts
        .iter()
        .chain(log.ends.iter())
        .map(|e| e.timestamp)
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        });

    diagnostics
}

fn count_misplaced(events: &[Event], expected: EventKind) -> usize {
    events.iter().filter(|e| e.kind != expected).count()
}
