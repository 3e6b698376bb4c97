//! Chart rendering.
//!
//! This module turns a `ChartSet` into SVG charts, a standalone HTML
//! page and a terminal summary.

pub mod generator;
pub mod summary;

// Re-export main types
pub use generator::{
    escape_xml,
    render_concurrency_chart,
    render_interval_chart,
    render_page,
    render_requests_chart,
    render_slowest_chart,
    ChartConfig,
};
pub use summary::generate_text_summary;
