//! Terminal summary of a chart set.

use crate::aggregator::ChartSet;

const RESET: &str = "\x1b[0m";

fn ansi_color(duration_ms: i64, slowest_ms: i64) -> &'static str {
    let ratio = duration_ms as f64 / slowest_ms.max(1) as f64;
    if ratio > 0.75 {
        "\x1b[31;1m" // Red
    } else if ratio > 0.4 {
        "\x1b[33m" // Yellow
    } else {
        "\x1b[32m" // Green
    }
}

/// Create a text summary: slowest templates table, per-category totals
/// and throughput / concurrency figures
pub fn generate_text_summary(charts: &ChartSet, max_lines: usize) -> String {
    let mut lines = Vec::new();
    let entries = &charts.slowest_templates.entries;
    let slowest_ms = entries.first().map(|e| e.duration_ms()).unwrap_or(0);

    lines.push("  SLOWEST TEMPLATES".to_string());
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<42} ┃ {:^12} ┃ {:^12} ┃ {:^12} ┃",
        "Template (slowest first)", "START ms", "END ms", "DURATION ms"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━┫".to_string());

    for entry in entries.iter().take(max_lines) {
        let display_id = if entry.id.chars().count() > 42 {
            let tail: String = entry.id.chars().rev().take(39).collect::<Vec<_>>().into_iter().rev().collect();
            format!("...{}", tail)
        } else {
            entry.id.clone()
        };

        lines.push(format!(
            "  ┃ {}{:<42}{} ┃ {:>12} ┃ {:>12} ┃ {:>12} ┃",
            ansi_color(entry.duration_ms(), slowest_ms),
            display_id,
            RESET,
            entry.start_offset_ms,
            entry.end_offset_ms,
            entry.duration_ms()
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┛".to_string());

    if entries.len() > max_lines {
        lines.push(format!("   (Showing top {} of {} ranked templates)", max_lines, entries.len()));
    }
    if !charts.slowest_templates.unmatched.is_empty() {
        lines.push(format!(
            "   ({} templates skipped: missing start or end marker)",
            charts.slowest_templates.unmatched.len()
        ));
    }

    lines.push(String::new());
    lines.push("  REQUESTS BY CATEGORY".to_string());
    let totals = charts.requests_over_time.totals();
    let grand_total = totals.values().fold(0u64, |acc, t| acc.saturating_add(*t));
    for (category, total) in &totals {
        let share = *total as f64 / grand_total.max(1) as f64 * 100.0;
        let bar = "█".repeat((share / 2.0) as usize);
        let name = if category.is_empty() { "(none)" } else { *category };
        lines.push(format!("  └─ {:<20} {:<50} {:>10} ({:>5.1}%)", name, bar, total, share));
    }

    lines.push(String::new());
    let histogram = &charts.requests_per_interval;
    let busiest = histogram.buckets.iter().map(|b| b.count).max().unwrap_or(0);
    lines.push(format!(
        "  Throughput: {} templates in {} buckets of {}ms (busiest bucket: {})",
        histogram.total_events(),
        histogram.buckets.len(),
        histogram.interval_ms,
        busiest
    ));
    lines.push(format!(
        "  Concurrency: peak {} | still running at end {}",
        charts.concurrency.peak_active, charts.concurrency.final_active
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{
        CategorySeries, ConcurrencySeries, DurationRanking, IntervalHistogram, RankedTemplate,
    };

    fn chart_set(entries: usize) -> ChartSet {
        ChartSet {
            requests_over_time: CategorySeries::default(),
            slowest_templates: DurationRanking {
                entries: (0..entries)
                    .map(|i| RankedTemplate {
                        id: format!("template-{}", i),
                        start_offset_ms: 0,
                        end_offset_ms: (entries - i) as i64 * 1000,
                    })
                    .collect(),
                unmatched: vec![],
            },
            requests_per_interval: IntervalHistogram::default(),
            concurrency: ConcurrencySeries::default(),
        }
    }

    #[test]
    fn test_summary_limits_lines() {
        let summary = generate_text_summary(&chart_set(5), 2);
        assert!(summary.contains("template-0"));
        assert!(summary.contains("template-1"));
        assert!(!summary.contains("template-2"));
        assert!(summary.contains("Showing top 2 of 5"));
    }

    #[test]
    fn test_summary_truncates_long_ids() {
        let mut charts = chart_set(1);
        charts.slowest_templates.entries[0].id = "x".repeat(60);
        let summary = generate_text_summary(&charts, 10);
        assert!(summary.contains(&format!("...{}", "x".repeat(39))));
        assert!(!summary.contains(&"x".repeat(43)));
    }
}
