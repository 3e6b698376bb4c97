//! Finished templates per interval.

use super::bucketing::{interval_millis, Bucketer};
use super::series::IntervalHistogram;
use crate::parser::schema::Event;
use crate::utils::error::AggregateError;
use log::debug;
use std::time::Duration;

/// Count END events per approximate interval
///
/// **Public** - main entry point for the throughput chart
///
/// Events are sorted by time on a working copy. The trailing partial
/// bucket is flushed, so every event is counted exactly once.
///
/// # Errors
/// * `AggregateError::EmptyDataSet` - `ends` is empty
/// * `AggregateError::InvalidConfig` - interval below one millisecond
pub fn requests_per_interval(
    ends: &[Event],
    interval: Duration,
) -> Result<IntervalHistogram, AggregateError> {
    let interval_ms = interval_millis(interval)?;

    let mut sorted: Vec<&Event> = ends.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first.timestamp, last.timestamp),
        _ => return Err(AggregateError::EmptyDataSet("interval histogram")),
    };

    let mut bucketer = Bucketer::seeded(first, interval_ms);
    let mut buckets = Vec::new();
    let mut count: u64 = 0;

    for event in &sorted {
        if let Some(mark) = bucketer.advance(event.timestamp) {
            buckets.push(mark.with_count(count));
            count = 0;
        }
        count += 1;
    }
    buckets.push(bucketer.flush(last).with_count(count));

    debug!(
        "Binned {} end events into {} buckets of ~{}ms",
        sorted.len(),
        buckets.len(),
        interval_ms
    );

    Ok(IntervalHistogram {
        interval_ms,
        buckets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn ends_at(offsets: &[i64]) -> Vec<Event> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, ms)| Event::end(format!("t{}", i), at_ms(*ms), "http", 1))
            .collect()
    }

    #[test]
    fn test_empty_is_error() {
        let result = requests_per_interval(&[], Duration::from_secs(1));
        assert_eq!(
            result,
            Err(AggregateError::EmptyDataSet("interval histogram"))
        );
    }

    #[test]
    fn test_single_event() {
        let hist = requests_per_interval(&ends_at(&[0]), Duration::from_secs(1)).unwrap();
        assert_eq!(hist.buckets.len(), 1);
        assert_eq!(hist.buckets[0].count, 1);
        assert_eq!(hist.buckets[0].end_offset_ms, 1000);
        assert_eq!(hist.buckets[0].elapsed_ms, 0);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let hist =
            requests_per_interval(&ends_at(&[2500, 0, 100, 2600]), Duration::from_secs(1)).unwrap();

        let counts: Vec<u64> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2]);
        assert_eq!(hist.buckets[0].elapsed_ms, 2500);
        assert_eq!(hist.buckets[1].end_offset_ms, 2000);
    }

    #[test]
    fn test_trigger_event_opens_next_bucket() {
        // 0..=1000 stay in the first bucket, 1001 triggers the overflow
        let hist = requests_per_interval(&ends_at(&[0, 500, 1000, 1001, 1200]), Duration::from_secs(1))
            .unwrap();

        let counts: Vec<u64> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 2]);
        assert_eq!(hist.total_events(), 5);
    }

    #[test]
    fn test_offsets_are_nominal() {
        // gaps much wider than the interval still report evenly spaced offsets
        let hist = requests_per_interval(&ends_at(&[0, 5000, 20000]), Duration::from_secs(1)).unwrap();

        let offsets: Vec<i64> = hist.buckets.iter().map(|b| b.end_offset_ms).collect();
        assert_eq!(offsets, vec![1000, 2000, 3000]);
        let observed: Vec<i64> = hist.buckets.iter().map(|b| b.elapsed_ms).collect();
        assert_eq!(observed, vec![5000, 20000, 20000]);
    }
}
