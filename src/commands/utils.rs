use crate::parser::{load_event_log, validate_event_log, LogDiagnostics};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a stats file and print its diagnostics
pub fn validate_stats_file(file_path: &Path) -> Result<LogDiagnostics> {
    println!("Validating stats file: {}", file_path.display());

    let log = load_event_log(file_path)
        .with_context(|| format!("Failed to load {}", file_path.display()))?;
    let diagnostics = validate_event_log(&log);

    println!("✓ Valid stats JSON");
    println!("  Start events: {}", diagnostics.start_events);
    println!("  End events:   {}", diagnostics.end_events);
    println!("  Unique ids:   {}", diagnostics.unique_ids);
    println!("  Categories:   {}", diagnostics.categories.len());
    println!("  Concurrency:  {}", log.concurrency);
    println!("  Time span:    {}ms", diagnostics.span_millis());

    if diagnostics.is_well_formed() {
        println!("✓ Every template has one start and one end marker");
    } else {
        println!("⚠ Pairing problems:");
        println!("  Started, never finished: {}", diagnostics.unmatched_starts.len());
        println!("  Finished, never started: {}", diagnostics.unmatched_ends.len());
        println!("  Duplicate ids:           {}", diagnostics.duplicate_ids.len());
        println!("  Misplaced events:        {}", diagnostics.misplaced_events);
    }

    Ok(diagnostics)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Template Charts Stats Schema");
    println!("Report Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Stats file (input):");
        println!("  template-start: array    - START markers");
        println!("  template-end: array      - END markers");
        println!("  concurrency: number      - Configured worker limit");
        println!("  <event>:");
        println!("    ID: string             - Template id");
        println!("    Time: string           - RFC 3339 timestamp");
        println!("    TemplateType: string   - Category (protocol)");
        println!("    Target: string         - Scanned target");
        println!("    ItemType: string       - 'start' or 'end'");
        println!("    Requests: number       - Requests sent (END markers)");
        println!();
        println!("Chart report (output):");
        println!("  version: string          - Report schema version");
        println!("  source: string           - Stats file used");
        println!("  interval_ms: number      - Bucket width");
        println!("  top_k: number            - Ranked template count");
        println!("  generated_at: string     - ISO 8601 timestamp");
        println!("  charts: object           - The four derived series");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Template Charts v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Charts for template execution logs: requests, slow templates, throughput, concurrency.");
}
