//! Render command implementation.
//!
//! The render command:
//! 1. Loads the event log
//! 2. Reports pairing problems
//! 3. Resolves the bucketing interval
//! 4. Computes the four chart series
//! 5. Writes the HTML page
//! 6. Writes the JSON report

use super::models::RenderArgs;
use crate::aggregator::{compute_all, AggregateConfig, ChartSet};
use crate::chart::{generate_text_summary, render_page};
use crate::output::{write_page, write_report, ChartReport};
use crate::parser::{interval_or_default, load_event_log, validate_event_log};
use crate::utils::config::MAX_TOP_K;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the render command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The computed chart set, after all requested files are written
///
/// # Errors
/// * Unreadable or malformed stats file
/// * Empty data set, or fewer paired templates than `top_k`
/// * File write errors
pub fn execute_render(args: RenderArgs) -> Result<ChartSet> {
    let start_time = Instant::now();

    info!("Rendering charts from: {}", args.input.display());

    // Step 1: Load event log
    info!("Step 1/6: Loading event log...");
    let log = load_event_log(&args.input)
        .with_context(|| format!("Failed to load event log from {}", args.input.display()))?;

    // Step 2: Diagnostics
    info!("Step 2/6: Checking event pairing...");
    let diagnostics = validate_event_log(&log);
    debug!("Event log: {}", diagnostics.summary());
    if !diagnostics.is_well_formed() {
        warn!(
            "Event log is not well formed: {} unmatched starts, {} unmatched ends, {} duplicate ids, {} misplaced events",
            diagnostics.unmatched_starts.len(),
            diagnostics.unmatched_ends.len(),
            diagnostics.duplicate_ids.len(),
            diagnostics.misplaced_events
        );
    }

    // Step 3: Interval
    info!("Step 3/6: Resolving interval...");
    let config = AggregateConfig::new()
        .with_interval(interval_or_default(&args.interval))
        .with_top_k(args.top_k);

    // Step 4: Aggregate
    info!("Step 4/6: Computing chart series...");
    let charts = compute_all(&log, &config).context("Failed to compute chart series")?;

    // Step 5: HTML page
    if let Some(html_path) = &args.output_html {
        info!("Step 5/6: Rendering chart page...");
        let page = render_page(&charts, &args.chart_config).context("Failed to render charts")?;
        write_page(&page, html_path).context("Failed to write chart page")?;
        info!("✓ Charts written to: {}", html_path.display());
    } else {
        info!("Step 5/6: Skipping chart page (not requested)");
    }

    // Step 6: JSON report
    if let Some(json_path) = &args.output_json {
        info!("Step 6/6: Writing chart report...");
        let report = ChartReport::new(args.input.display().to_string(), &config, charts.clone());
        write_report(&report, json_path).context("Failed to write chart report")?;
        info!("✓ Report written to: {}", json_path.display());
    } else {
        info!("Step 6/6: Skipping chart report (not requested)");
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("TEMPLATE EXECUTION SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Source:      {}", args.input.display());
        println!("Events:      {}", log.len());
        println!("Concurrency: {} (configured)", log.concurrency);
        println!("\n{}", generate_text_summary(&charts, 10));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Render completed in {:.2}s", elapsed.as_secs_f64());

    Ok(charts)
}

/// Validate render arguments
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output_html.is_none() && args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: request an HTML page, a JSON report or a summary");
    }

    if args.top_k == 0 {
        anyhow::bail!("top_k must be greater than 0");
    }

    if args.top_k > MAX_TOP_K {
        anyhow::bail!("top_k is too large (max {})", MAX_TOP_K);
    }

    Ok(())
}
