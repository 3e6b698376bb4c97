//! Top-K slowest templates by execution time.
//!
//! Pairs each id's START and END marker, measures both against the
//! earliest START event and ranks ids by duration, longest first.

use super::bucketing::offset_ms;
use super::series::{DurationRanking, RankedTemplate, UnmatchedEvent};
use crate::parser::schema::{EventKind, EventLog};
use crate::utils::error::AggregateError;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;

#[derive(Default)]
struct Pairing {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

/// Rank templates by duration and keep the `top_k` slowest
///
/// **Public** - main entry point for the slow-templates chart
///
/// Only the first START and first END of an id are considered. Ids
/// missing either marker are skipped and listed in `unmatched`. Equal
/// durations keep first-encounter order.
///
/// # Errors
/// * `AggregateError::InvalidConfig` - `top_k` is zero
/// * `AggregateError::InsufficientData` - fewer than `top_k` paired ids
pub fn slowest_templates(log: &EventLog, top_k: usize) -> Result<DurationRanking, AggregateError> {
    if top_k == 0 {
        return Err(AggregateError::InvalidConfig(
            "top_k must be greater than 0".to_string(),
        ));
    }

    let mut order: Vec<&str> = Vec::new();
    let mut pairs: HashMap<&str, Pairing> = HashMap::new();

    for (events, kind) in [(&log.starts, EventKind::Start), (&log.ends, EventKind::End)] {
        for event in events {
            let pairing = pairs.entry(event.id.as_str()).or_insert_with(|| {
                order.push(event.id.as_str());
                Pairing::default()
            });
            let slot = match kind {
                EventKind::Start => &mut pairing.start,
                EventKind::End => &mut pairing.end,
            };
            if slot.is_none() {
                *slot = Some(event.timestamp);
            } else {
                debug!("Ignoring repeated {} marker for {}", kind, event.id);
            }
        }
    }

    let mut entries = Vec::with_capacity(order.len());
    let mut unmatched = Vec::new();

    // every paired id has a START, so the minimum exists whenever entries do
    if let Some(origin) = log.starts.iter().map(|e| e.timestamp).min() {
        for id in &order {
            match pairs[id] {
                Pairing { start: Some(start), end: Some(end) } => entries.push(RankedTemplate {
                    id: id.to_string(),
                    start_offset_ms: offset_ms(start, origin),
                    end_offset_ms: offset_ms(end, origin),
                }),
                Pairing { start: None, .. } => unmatched.push(UnmatchedEvent {
                    id: id.to_string(),
                    missing: EventKind::Start,
                }),
                Pairing { end: None, .. } => unmatched.push(UnmatchedEvent {
                    id: id.to_string(),
                    missing: EventKind::End,
                }),
            }
        }
    } else {
        unmatched.extend(order.iter().map(|id| UnmatchedEvent {
            id: id.to_string(),
            missing: EventKind::Start,
        }));
    }

    if !unmatched.is_empty() {
        warn!("Skipping {} unmatched templates in duration ranking", unmatched.len());
    }

    if entries.len() < top_k {
        return Err(AggregateError::InsufficientData {
            available: entries.len(),
            requested: top_k,
        });
    }

    entries.sort_by(|a, b| b.duration_ms().cmp(&a.duration_ms()));
    entries.truncate(top_k);

    debug!(
        "Ranked top {} templates (slowest {}ms)",
        entries.len(),
        entries.first().map(|e| e.duration_ms()).unwrap_or(0)
    );

    Ok(DurationRanking { entries, unmatched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::Event;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let result = slowest_templates(&EventLog::default(), 0);
        assert!(matches!(result, Err(AggregateError::InvalidConfig(_))));
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let log = EventLog::new(
            vec![
                Event::start("x", at(0), "http"),
                Event::start("y", at(1), "http"),
                Event::start("z", at(2), "http"),
            ],
            vec![
                Event::end("z", at(4), "http", 0),
                Event::end("y", at(3), "http", 0),
                Event::end("x", at(2), "http", 0),
            ],
        );

        let ranking = slowest_templates(&log, 3).unwrap();
        let ids: Vec<&str> = ranking.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_repeated_markers_use_first() {
        let log = EventLog::new(
            vec![Event::start("a", at(0), "http"), Event::start("a", at(5), "http")],
            vec![Event::end("a", at(3), "http", 0), Event::end("a", at(9), "http", 0)],
        );

        let ranking = slowest_templates(&log, 1).unwrap();
        assert_eq!(ranking.entries[0].start_offset_ms, 0);
        assert_eq!(ranking.entries[0].end_offset_ms, 3000);
    }

    #[test]
    fn test_no_starts_marks_everything_unmatched() {
        let log = EventLog::new(vec![], vec![Event::end("a", at(3), "http", 0)]);

        let result = slowest_templates(&log, 1);
        assert_eq!(
            result,
            Err(AggregateError::InsufficientData { available: 0, requested: 1 })
        );
    }
}
