//! Template Charts
//!
//! Time-series views over template execution logs: cumulative
//! requests per category, the slowest templates, templates finished
//! per interval and concurrent templates over time.
//!
//! This crate provides the aggregation engine and the core
//! implementation for the `template-charts` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install template-charts
//! template-charts render --input stats.json --output charts.html
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
