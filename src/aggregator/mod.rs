//! Aggregation of template execution events into chart series.
//!
//! This module transforms an `EventLog` into:
//! - Cumulative requests per category
//! - Top-K slowest templates
//! - Finished templates per interval
//! - Concurrent templates per interval
//!
//! Every function here is a pure computation over a borrowed log; sorted
//! copies are local, so the same log can be aggregated from any number
//! of threads at once.

mod bucketing;
pub mod category;
pub mod concurrency;
pub mod duration;
pub mod interval;
pub mod series;

use crate::parser::schema::EventLog;
use crate::utils::config::{DEFAULT_INTERVAL, DEFAULT_TOP_K};
use crate::utils::error::AggregateError;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Re-export main types and functions
pub use category::requests_over_time;
pub use concurrency::concurrency_over_time;
pub use duration::slowest_templates;
pub use interval::requests_per_interval;
pub use series::{
    CategoryPoint, CategorySeries, ConcurrencyBucket, ConcurrencySeries, DurationRanking,
    IntervalBucket, IntervalHistogram, RankedTemplate, UnmatchedEvent,
};

/// Engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Bucket width for the interval and concurrency series
    pub interval: Duration,

    /// Number of slowest templates to keep
    pub top_k: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AggregateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Reject parameters no aggregation can work with
    pub fn validate(&self) -> Result<(), AggregateError> {
        bucketing::interval_millis(self.interval)?;
        if self.top_k == 0 {
            return Err(AggregateError::InvalidConfig(
                "top_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// The four derived series of one event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSet {
    pub requests_over_time: CategorySeries,
    pub slowest_templates: DurationRanking,
    pub requests_per_interval: IntervalHistogram,
    pub concurrency: ConcurrencySeries,
}

/// Compute every chart series for a log
///
/// **Public** - main entry point for the engine
///
/// # Errors
/// Any failure of an individual aggregation is returned as-is; no
/// partial chart set is produced.
pub fn compute_all(log: &EventLog, config: &AggregateConfig) -> Result<ChartSet, AggregateError> {
    config.validate()?;

    info!(
        "Aggregating {} events (interval {}ms, top {})",
        log.len(),
        config.interval.as_millis(),
        config.top_k
    );

    Ok(ChartSet {
        requests_over_time: requests_over_time(&log.ends),
        slowest_templates: slowest_templates(log, config.top_k)?,
        requests_per_interval: requests_per_interval(&log.ends, config.interval)?,
        concurrency: concurrency_over_time(log, config.interval)?,
    })
}
