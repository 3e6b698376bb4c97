use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::time::Duration;
use template_charts::aggregator::{
    compute_all, concurrency_over_time, requests_over_time, requests_per_interval,
    slowest_templates, AggregateConfig, RankedTemplate,
};
use template_charts::output::save_event_log;
use template_charts::parser::load_event_log;
use template_charts::parser::schema::{Event, EventLog};
use template_charts::utils::error::AggregateError;

fn at_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
}

const CATEGORIES: [&str; 3] = ["http", "dns", "network"];

/// `count` templates, started 70ms apart, each running a different length
fn paired_log(count: usize) -> EventLog {
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for i in 0..count {
        let id = format!("template-{}", i);
        let category = CATEGORIES[i % CATEGORIES.len()];
        let start = i as i64 * 70;
        let end = start + 150 + ((i * 37) % 900) as i64;
        starts.push(Event::start(&id, at_ms(start), category));
        ends.push(Event::end(&id, at_ms(end), category, (i % 5) as u64));
    }
    // ends arrive out of order in real logs
    ends.reverse();
    EventLog::new(starts, ends)
}

#[test]
fn test_cumulative_requests_never_decrease() {
    let log = paired_log(60);
    let series = requests_over_time(&log.ends);

    assert_eq!(series.categories.len(), 3);
    for points in series.categories.values() {
        for pair in points.windows(2) {
            assert!(pair[1].cumulative_requests >= pair[0].cumulative_requests);
        }
    }

    let total: u64 = series.totals().values().sum();
    let expected: u64 = log.ends.iter().map(|e| e.request_count).sum();
    assert_eq!(total, expected);
}

#[test]
fn test_interval_counts_cover_every_end() {
    let log = paired_log(60);
    for interval in [Duration::from_millis(50), Duration::from_millis(300), Duration::from_secs(2)] {
        let histogram = requests_per_interval(&log.ends, interval).unwrap();
        assert_eq!(histogram.total_events(), log.ends.len() as u64);
    }
}

#[test]
fn test_ten_events_in_one_second_make_one_bucket() {
    let ends: Vec<Event> = (0..10)
        .map(|i| Event::end(format!("t{}", i), at_ms(i * 100), "http", 1))
        .collect();

    let histogram = requests_per_interval(&ends, Duration::from_secs(1)).unwrap();

    assert_eq!(histogram.buckets.len(), 1);
    assert_eq!(histogram.buckets[0].count, 10);
    assert_eq!(histogram.buckets[0].end_offset_ms, 1000);
}

#[test]
fn test_trailing_bucket_is_flushed() {
    // the last two events never trigger another overflow
    let ends: Vec<Event> = [0, 100, 2000, 2100]
        .iter()
        .enumerate()
        .map(|(i, ms)| Event::end(format!("t{}", i), at_ms(*ms), "http", 1))
        .collect();

    let histogram = requests_per_interval(&ends, Duration::from_secs(1)).unwrap();
    let counts: Vec<u64> = histogram.buckets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2]);
}

#[test]
fn test_ranking_three_templates() {
    let log = EventLog::new(
        vec![
            Event::start("id1", at_ms(0), "http"),
            Event::start("id2", at_ms(1000), "http"),
            Event::start("id3", at_ms(2000), "http"),
        ],
        vec![
            Event::end("id1", at_ms(5000), "http", 1),
            Event::end("id2", at_ms(3000), "http", 1),
            Event::end("id3", at_ms(10000), "http", 1),
        ],
    );

    let ranking = slowest_templates(&log, 3).unwrap();

    assert_eq!(
        ranking.entries,
        vec![
            RankedTemplate { id: "id3".to_string(), start_offset_ms: 2000, end_offset_ms: 10000 },
            RankedTemplate { id: "id1".to_string(), start_offset_ms: 0, end_offset_ms: 5000 },
            RankedTemplate { id: "id2".to_string(), start_offset_ms: 1000, end_offset_ms: 3000 },
        ]
    );
}

#[test]
fn test_ranking_is_top_k() {
    let log = paired_log(80);
    let ranking = slowest_templates(&log, 50).unwrap();

    assert_eq!(ranking.entries.len(), 50);
    for pair in ranking.entries.windows(2) {
        assert!(pair[0].duration_ms() >= pair[1].duration_ms());
    }

    // nothing left out is slower than the last kept entry
    let cutoff = ranking.entries.last().unwrap().duration_ms();
    let all = slowest_templates(&log, 80).unwrap();
    let kept: Vec<&str> = ranking.entries.iter().map(|e| e.id.as_str()).collect();
    for entry in all.entries.iter().filter(|e| !kept.contains(&e.id.as_str())) {
        assert!(entry.duration_ms() <= cutoff);
    }
}

#[test]
fn test_ranking_with_too_few_templates() {
    let log = paired_log(2);
    let result = slowest_templates(&log, 50);
    assert_eq!(
        result,
        Err(AggregateError::InsufficientData { available: 2, requested: 50 })
    );
}

#[test]
fn test_ranking_skips_unmatched_ids() {
    let mut log = paired_log(3);
    log.starts.push(Event::start("orphan-start", at_ms(5), "http"));
    log.ends.push(Event::end("orphan-end", at_ms(9000), "http", 1));

    let ranking = slowest_templates(&log, 3).unwrap();

    assert_eq!(ranking.entries.len(), 3);
    let unmatched: Vec<&str> = ranking.unmatched.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(unmatched, vec!["orphan-start", "orphan-end"]);

    // pairing problems leave the other aggregations alone
    let histogram = requests_per_interval(&log.ends, Duration::from_secs(1)).unwrap();
    assert_eq!(histogram.total_events(), 4);
}

#[test]
fn test_concurrency_paired_never_negative() {
    let log = paired_log(60);
    let series = concurrency_over_time(&log, Duration::from_millis(200)).unwrap();

    assert!(series.min_active >= 0);
    assert!(series.buckets.iter().all(|b| b.active >= 0));
    assert_eq!(series.final_active, 0);
    assert_eq!(series.buckets.last().unwrap().active, 0);
    assert!(series.peak_active > 1);
}

#[test]
fn test_concurrency_final_count_with_running_templates() {
    let mut log = paired_log(10);
    log.ends.truncate(6);

    let series = concurrency_over_time(&log, Duration::from_secs(1)).unwrap();
    let expected = log.starts.len() as i64 - log.ends.len() as i64;

    assert_eq!(series.final_active, expected);
    assert_eq!(series.buckets.last().unwrap().active, expected);
}

#[test]
fn test_empty_inputs_are_errors() {
    let empty = EventLog::default();
    assert_eq!(
        requests_per_interval(&empty.ends, Duration::from_secs(1)),
        Err(AggregateError::EmptyDataSet("interval histogram"))
    );
    assert!(matches!(
        concurrency_over_time(&empty, Duration::from_secs(1)),
        Err(AggregateError::EmptyDataSet(_))
    ));
    assert!(requests_over_time(&empty.ends).is_empty());
}

#[test]
fn test_compute_all_is_pure() {
    let log = paired_log(70);
    let snapshot = log.clone();
    let config = AggregateConfig::new().with_interval(Duration::from_millis(500));

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("stats.json");
    save_event_log(&log, &path).unwrap();
    let loaded = load_event_log(&path).unwrap();
    assert_eq!(loaded, log);

    let first = compute_all(&loaded, &config).unwrap();
    let second = compute_all(&loaded, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, compute_all(&log, &config).unwrap());
    assert_eq!(loaded, snapshot);
    assert_eq!(log, snapshot);
}

#[test]
fn test_compute_all_from_threads() {
    let log = std::sync::Arc::new(paired_log(55));
    let config = AggregateConfig::new();
    let expected = compute_all(&log, &config).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let log = std::sync::Arc::clone(&log);
            std::thread::spawn(move || compute_all(&log, &config).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_compute_all_propagates_insufficient_data() {
    let log = paired_log(5);
    let result = compute_all(&log, &AggregateConfig::new());
    assert!(matches!(
        result,
        Err(AggregateError::InsufficientData { available: 5, requested: 50 })
    ));

    assert!(compute_all(&log, &AggregateConfig::new().with_top_k(5)).is_ok());
}
