//! Advance-on-overflow bucketing shared by the interval binner and the
//! concurrency sweeper.
//!
//! The bucket boundary starts at the first event. An event further than
//! one interval past the boundary closes the current bucket and becomes
//! the new boundary; it is counted in the new bucket. Bucket widths are
//! therefore driven by event spacing, while the reported offsets are
//! evenly spaced multiples of the interval.

use super::series::{ConcurrencyBucket, IntervalBucket};
use crate::utils::error::AggregateError;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::time::Duration;

/// Position of a bucket that just closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BucketMark {
    pub end_offset_ms: i64,
    pub elapsed_ms: i64,
}

impl BucketMark {
    pub fn with_count(self, count: u64) -> IntervalBucket {
        IntervalBucket {
            end_offset_ms: self.end_offset_ms,
            elapsed_ms: self.elapsed_ms,
            count,
        }
    }

    pub fn with_active(self, active: i64) -> ConcurrencyBucket {
        ConcurrencyBucket {
            end_offset_ms: self.end_offset_ms,
            elapsed_ms: self.elapsed_ms,
            active,
        }
    }
}

/// Convert a bucketing interval to whole milliseconds
///
/// Sub-millisecond remainders are dropped.
pub(crate) fn interval_millis(interval: Duration) -> Result<i64, AggregateError> {
    let millis = i64::try_from(interval.as_millis())
        .map_err(|_| AggregateError::InvalidConfig("interval is too large".to_string()))?;

    if millis < 1 {
        return Err(AggregateError::InvalidConfig(format!(
            "interval must be at least 1ms (got {:?})",
            interval
        )));
    }

    Ok(millis)
}

/// Milliseconds from `origin` to `t`
pub(crate) fn offset_ms(t: DateTime<Utc>, origin: DateTime<Utc>) -> i64 {
    (t - origin).num_milliseconds()
}

/// ACCUMULATING -> (overflow) -> EMIT_AND_RESET -> ACCUMULATING
#[derive(Debug)]
pub(crate) struct Bucketer {
    interval_ms: i64,
    width: TimeDelta,
    origin: DateTime<Utc>,
    boundary: DateTime<Utc>,
    closed: i64,
}

impl Bucketer {
    /// Start accumulating at the first event
    pub fn seeded(first: DateTime<Utc>, interval_ms: i64) -> Self {
        Self {
            interval_ms,
            width: TimeDelta::milliseconds(interval_ms),
            origin: first,
            boundary: first,
            closed: 0,
        }
    }

    /// Feed the next event time
    ///
    /// Returns the mark of the bucket closed by this event, if any. The
    /// caller must record its snapshot before applying the event.
    pub fn advance(&mut self, t: DateTime<Utc>) -> Option<BucketMark> {
        if t - self.boundary > self.width {
            let mark = self.close(t);
            self.boundary = t;
            Some(mark)
        } else {
            None
        }
    }

    /// Close the trailing open bucket after the last event
    pub fn flush(&mut self, last: DateTime<Utc>) -> BucketMark {
        self.close(last)
    }

    fn close(&mut self, t: DateTime<Utc>) -> BucketMark {
        self.closed += 1;
        BucketMark {
            end_offset_ms: self.closed.saturating_mul(self.interval_ms),
            elapsed_ms: offset_ms(t, self.origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_no_overflow_within_interval() {
        let mut bucketer = Bucketer::seeded(at_ms(0), 1000);
        assert!(bucketer.advance(at_ms(0)).is_none());
        assert!(bucketer.advance(at_ms(999)).is_none());
        // exactly one interval past the boundary is not an overflow
        assert!(bucketer.advance(at_ms(1000)).is_none());
    }

    #[test]
    fn test_overflow_moves_boundary_to_trigger() {
        let mut bucketer = Bucketer::seeded(at_ms(0), 1000);
        let mark = bucketer.advance(at_ms(1500)).unwrap();
        assert_eq!(mark, BucketMark { end_offset_ms: 1000, elapsed_ms: 1500 });

        // boundary is now 1500, not 1000
        assert!(bucketer.advance(at_ms(2400)).is_none());
        let mark = bucketer.advance(at_ms(2501)).unwrap();
        assert_eq!(mark.end_offset_ms, 2000);
        assert_eq!(mark.elapsed_ms, 2501);
    }

    #[test]
    fn test_flush_continues_offsets() {
        let mut bucketer = Bucketer::seeded(at_ms(0), 250);
        bucketer.advance(at_ms(300)).unwrap();
        let mark = bucketer.flush(at_ms(400));
        assert_eq!(mark.end_offset_ms, 500);
        assert_eq!(mark.elapsed_ms, 400);
    }

    #[test]
    fn test_interval_millis_bounds() {
        assert_eq!(interval_millis(Duration::from_secs(2)).unwrap(), 2000);
        assert_eq!(interval_millis(Duration::from_micros(1500)).unwrap(), 1);
        assert!(interval_millis(Duration::from_micros(500)).is_err());
        assert!(interval_millis(Duration::ZERO).is_err());
    }
}
