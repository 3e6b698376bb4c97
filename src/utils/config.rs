//! Configuration and constants for the engine and CLI.

use std::time::Duration;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of slowest templates kept by the duration ranking
pub const DEFAULT_TOP_K: usize = 50;

/// Bucket width used when no (or an unparsable) interval is given
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound accepted for `--top-k`
pub const MAX_TOP_K: usize = 10_000;

/// Stats file read by default
pub const DEFAULT_STATS_FILE: &str = "stats.json";

/// Environment variable overriding the stats file location
pub const STATS_FILE_ENV: &str = "TEMPLATE_CHARTS_STATS_FILE";

// Chart geometry
pub const DEFAULT_CHART_WIDTH: usize = 1200;
pub const DEFAULT_CHART_HEIGHT: usize = 420;
pub const MIN_CHART_WIDTH: usize = 200;
