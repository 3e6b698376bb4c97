//! Concurrent in-flight templates over time.
//!
//! A sweep over the merged START/END timeline keeps a signed counter
//! (+1 per START, -1 per END) and snapshots it each time a bucket
//! closes, using the same overflow rule as the interval histogram.
//! Equal timestamps put STARTs before ENDs, otherwise the merge keeps
//! encounter order (all starts, then all ends).

use super::bucketing::{interval_millis, Bucketer};
use super::series::ConcurrencySeries;
use crate::parser::schema::{EventKind, EventLog};
use crate::utils::error::AggregateError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::time::Duration;

fn sweep_rank(kind: EventKind) -> u8 {
    match kind {
        EventKind::Start => 0,
        EventKind::End => 1,
    }
}

fn delta(kind: EventKind) -> i64 {
    match kind {
        EventKind::Start => 1,
        EventKind::End => -1,
    }
}

/// Merge both sequences into one sweep order
///
/// The sequence an event sits in decides its direction, not its `kind`
/// field.
fn merged_timeline(log: &EventLog) -> Vec<(DateTime<Utc>, EventKind)> {
    let mut timeline: Vec<(DateTime<Utc>, EventKind)> = log
        .starts
        .iter()
        .map(|e| (e.timestamp, EventKind::Start))
        .chain(log.ends.iter().map(|e| (e.timestamp, EventKind::End)))
        .collect();

    timeline.sort_by_key(|(t, kind)| (*t, sweep_rank(*kind)));
    timeline
}

/// Sample active template count per approximate interval
///
/// **Public** - main entry point for the concurrency chart
///
/// Each bucket records the counter as it stood when the bucket closed,
/// before the triggering event is applied. The trailing bucket is
/// flushed, so the last snapshot equals `starts - ends`.
///
/// # Errors
/// * `AggregateError::EmptyDataSet` - the log has no events at all
/// * `AggregateError::InvalidConfig` - interval below one millisecond
pub fn concurrency_over_time(
    log: &EventLog,
    interval: Duration,
) -> Result<ConcurrencySeries, AggregateError> {
    let interval_ms = interval_millis(interval)?;
    let timeline = merged_timeline(log);

    let (first, last) = match (timeline.first(), timeline.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => return Err(AggregateError::EmptyDataSet("concurrency series")),
    };

    let mut bucketer = Bucketer::seeded(first, interval_ms);
    let mut buckets = Vec::new();
    let mut active: i64 = 0;
    let mut peak_active: i64 = 0;
    let mut min_active: i64 = 0;

    for (t, kind) in &timeline {
        if let Some(mark) = bucketer.advance(*t) {
            buckets.push(mark.with_active(active));
        }
        active += delta(*kind);
        peak_active = peak_active.max(active);
        min_active = min_active.min(active);
    }
    buckets.push(bucketer.flush(last).with_active(active));

    if min_active < 0 {
        warn!(
            "Concurrency dropped to {} (end markers without earlier starts)",
            min_active
        );
    }

    debug!(
        "Swept {} events into {} buckets, peak concurrency {}",
        timeline.len(),
        buckets.len(),
        peak_active
    );

    Ok(ConcurrencySeries {
        interval_ms,
        buckets,
        peak_active,
        min_active,
        final_active: active,
    })
}
