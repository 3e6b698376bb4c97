//! Cumulative requests per category.
//!
//! Groups END events by category and accumulates their request counts
//! in the order the events were recorded. Elapsed time is measured from
//! the earliest END event of the whole log, not of the category.

use super::bucketing::offset_ms;
use super::series::{CategoryPoint, CategorySeries};
use crate::parser::schema::Event;
use log::debug;
use std::collections::BTreeMap;

/// Build the cumulative request line for every category
///
/// **Public** - main entry point for the requests-over-time chart
///
/// An empty `ends` slice yields an empty series.
pub fn requests_over_time(ends: &[Event]) -> CategorySeries {
    let Some(origin) = ends.iter().map(|e| e.timestamp).min() else {
        return CategorySeries::default();
    };

    let mut groups: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for event in ends {
        groups.entry(event.category.as_str()).or_default().push(event);
    }

    let categories: BTreeMap<String, Vec<CategoryPoint>> = groups
        .into_iter()
        .map(|(name, events)| {
            let points = events
                .into_iter()
                .scan(0u64, |total, event| {
                    *total = total.saturating_add(event.request_count);
                    Some(CategoryPoint {
                        elapsed_ms: offset_ms(event.timestamp, origin),
                        cumulative_requests: *total,
                        id: event.id.clone(),
                    })
                })
                .collect();
            (name.to_string(), points)
        })
        .collect();

    debug!(
        "Built cumulative request series for {} categories from {} end events",
        categories.len(),
        ends.len()
    );

    CategorySeries { categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_empty_ends() {
        assert!(requests_over_time(&[]).is_empty());
    }

    #[test]
    fn test_encounter_order_is_kept() {
        // second http event is earlier in time but later in the log
        let ends = vec![
            Event::end("a", at_ms(500), "http", 3),
            Event::end("b", at_ms(100), "dns", 1),
            Event::end("c", at_ms(200), "http", 4),
        ];

        let series = requests_over_time(&ends);
        let http = &series.categories["http"];

        assert_eq!(http.len(), 2);
        assert_eq!(http[0].id, "a");
        assert_eq!(http[0].elapsed_ms, 400);
        assert_eq!(http[0].cumulative_requests, 3);
        assert_eq!(http[1].id, "c");
        assert_eq!(http[1].elapsed_ms, 100);
        assert_eq!(http[1].cumulative_requests, 7);
    }

    #[test]
    fn test_origin_is_global_minimum() {
        let ends = vec![
            Event::end("a", at_ms(1000), "http", 1),
            Event::end("b", at_ms(250), "dns", 1),
        ];

        let series = requests_over_time(&ends);
        assert_eq!(series.categories["http"][0].elapsed_ms, 750);
        assert_eq!(series.categories["dns"][0].elapsed_ms, 0);
        assert_eq!(series.max_elapsed_ms(), 750);
    }

    #[test]
    fn test_totals() {
        let ends = vec![
            Event::end("a", at_ms(0), "http", 2),
            Event::end("b", at_ms(10), "http", 0),
            Event::end("c", at_ms(20), "ssl", 9),
        ];

        let binding = requests_over_time(&ends);
        let totals = binding.totals();
        assert_eq!(totals["http"], 2);
        assert_eq!(totals["ssl"], 9);
    }
}
