//! Event log schema definitions.
//!
//! This module defines the structure of the stats files we read from disk.
//! Field names follow the persisted record produced by the scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker kind of a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Start,
    End,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Start => write!(f, "start"),
            EventKind::End => write!(f, "end"),
        }
    }
}

/// One template execution marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the unit of work
    #[serde(rename = "ID")]
    pub id: String,

    /// When the event occurred
    #[serde(rename = "Time")]
    pub timestamp: DateTime<Utc>,

    /// Classification label (protocol / template type)
    #[serde(rename = "TemplateType", default)]
    pub category: String,

    /// Free-form target label, not used by the aggregations
    #[serde(rename = "Target", default)]
    pub target: String,

    #[serde(rename = "ItemType")]
    pub kind: EventKind,

    /// Requests issued by the unit of work (meaningful on END events)
    #[serde(rename = "Requests", default)]
    pub request_count: u64,
}

impl Event {
    /// Create a START marker
    pub fn start(id: impl Into<String>, timestamp: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            category: category.into(),
            target: String::new(),
            kind: EventKind::Start,
            request_count: 0,
        }
    }

    /// Create an END marker carrying a request count
    pub fn end(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        category: impl Into<String>,
        request_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            category: category.into(),
            target: String::new(),
            kind: EventKind::End,
            request_count,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

/// The full stats record: started and finished template executions
///
/// Neither sequence is required to be sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(rename = "template-start", default)]
    pub starts: Vec<Event>,

    #[serde(rename = "template-end", default)]
    pub ends: Vec<Event>,

    /// Worker limit the scan was configured with
    #[serde(default)]
    pub concurrency: u32,
}

impl EventLog {
    pub fn new(starts: Vec<Event>, ends: Vec<Event>) -> Self {
        Self {
            starts,
            ends,
            concurrency: 0,
        }
    }

    pub fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Total number of events across both sequences
    pub fn len(&self) -> usize {
        self.starts.len() + self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.ends.is_empty()
    }
}
