//! Derived series produced by the aggregators.
//!
//! These are plain data handed to the chart renderer or serialized into
//! a report. Every x value is milliseconds elapsed since a reference
//! instant chosen by the aggregator that produced the series.

use crate::parser::schema::EventKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point on a category's cumulative request line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPoint {
    /// Elapsed time since the earliest END event
    pub elapsed_ms: i64,

    /// Running total of requests within the category
    pub cumulative_requests: u64,

    /// Id of the event that produced this point
    pub id: String,
}

/// Cumulative requests over time, keyed by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub categories: BTreeMap<String, Vec<CategoryPoint>>,
}

impl CategorySeries {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Final running total per category
    pub fn totals(&self) -> BTreeMap<&str, u64> {
        self.categories
            .iter()
            .map(|(name, points)| {
                let total = points.last().map(|p| p.cumulative_requests).unwrap_or(0);
                (name.as_str(), total)
            })
            .collect()
    }

    /// Largest elapsed time across all categories
    pub fn max_elapsed_ms(&self) -> i64 {
        self.categories
            .values()
            .flat_map(|points| points.iter().map(|p| p.elapsed_ms))
            .max()
            .unwrap_or(0)
    }
}

/// A template placed in the slowest-templates ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTemplate {
    pub id: String,

    /// START offset from the earliest START event
    pub start_offset_ms: i64,

    /// END offset from the earliest START event
    pub end_offset_ms: i64,
}

impl RankedTemplate {
    pub fn duration_ms(&self) -> i64 {
        self.end_offset_ms - self.start_offset_ms
    }
}

/// An id that could not be paired and was left out of the ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedEvent {
    pub id: String,

    /// The marker that was never recorded
    pub missing: EventKind,
}

/// Slowest templates, longest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRanking {
    pub entries: Vec<RankedTemplate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<UnmatchedEvent>,
}

/// Events counted in one interval bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalBucket {
    /// Nominal bucket end: `(index + 1) * interval`
    pub end_offset_ms: i64,

    /// Observed time since the first event when the bucket closed
    pub elapsed_ms: i64,

    pub count: u64,
}

/// Events per (approximate) interval
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalHistogram {
    pub interval_ms: i64,
    pub buckets: Vec<IntervalBucket>,
}

impl IntervalHistogram {
    pub fn total_events(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Active work snapshot taken when a bucket closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyBucket {
    /// Nominal bucket end: `(index + 1) * interval`
    pub end_offset_ms: i64,

    /// Observed time since the first event when the bucket closed
    pub elapsed_ms: i64,

    pub active: i64,
}

/// In-flight work over time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencySeries {
    pub interval_ms: i64,
    pub buckets: Vec<ConcurrencyBucket>,

    /// Highest counter value seen during the sweep
    pub peak_active: i64,

    /// Lowest counter value seen during the sweep
    pub min_active: i64,

    /// Counter value after the last event
    pub final_active: i64,
}
