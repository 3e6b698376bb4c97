//! Bucketing interval parsing.
//!
//! Intervals come from the command line as human durations such as
//! `1s`, `500ms` or `1m30s`. A bad value never aborts a computation:
//! callers use [`interval_or_default`] which falls back to one second.

use crate::utils::config::DEFAULT_INTERVAL;
use crate::utils::error::ParseError;
use log::warn;
use std::time::Duration;

/// Parse an interval string
///
/// # Errors
/// * `ParseError::MalformedInterval` - unparsable text or a zero duration
pub fn parse_interval(text: &str) -> Result<Duration, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::MalformedInterval(text.to_string()));
    }

    let duration = humantime::parse_duration(trimmed)
        .map_err(|_| ParseError::MalformedInterval(text.to_string()))?;

    if duration.is_zero() {
        return Err(ParseError::MalformedInterval(text.to_string()));
    }

    Ok(duration)
}

/// Parse an interval string, substituting the default on failure
pub fn interval_or_default(text: &str) -> Duration {
    match parse_interval(text) {
        Ok(duration) => duration,
        Err(e) => {
            warn!(
                "Could not parse interval: {} (using {})",
                e,
                humantime::format_duration(DEFAULT_INTERVAL)
            );
            DEFAULT_INTERVAL
        }
    }
}
