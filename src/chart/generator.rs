//! SVG chart generation and HTML page assembly.
//!
//! Charts are written by hand as SVG strings:
//! - Line charts for requests, throughput and concurrency
//! - Floating bars (start to end offset) for the slowest templates
//! - A standalone HTML page holding all four

use crate::aggregator::{
    CategorySeries, ChartSet, ConcurrencySeries, DurationRanking, IntervalHistogram,
};
use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, MIN_CHART_WIDTH};
use crate::utils::error::ChartError;
use log::{debug, info};

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    /// Dark background theme
    pub dark: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Template Execution Charts".to_string(),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            dark: true,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    pub fn with_dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.width < MIN_CHART_WIDTH {
            return Err(ChartError::TooNarrow(self.width, MIN_CHART_WIDTH));
        }
        if self.height == 0 {
            return Err(ChartError::ZeroHeight);
        }
        Ok(())
    }

    fn theme(&self) -> Theme {
        if self.dark {
            Theme {
                background: "rgb(16, 12, 42)",
                foreground: "rgb(238, 238, 238)",
                grid: "rgb(60, 60, 90)",
            }
        } else {
            Theme {
                background: "rgb(255, 255, 255)",
                foreground: "rgb(40, 40, 40)",
                grid: "rgb(220, 220, 220)",
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Theme {
    background: &'static str,
    foreground: &'static str,
    grid: &'static str,
}

const PALETTE: [&str; 8] = [
    "rgb(84, 112, 198)",
    "rgb(145, 204, 117)",
    "rgb(250, 200, 88)",
    "rgb(238, 102, 102)",
    "rgb(115, 192, 222)",
    "rgb(59, 162, 114)",
    "rgb(252, 132, 82)",
    "rgb(154, 96, 180)",
];

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: i64 = 5;

/// Escape text for SVG / HTML bodies and attributes
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Milliseconds as seconds, e.g. `1.5s`
fn format_seconds(ms: i64) -> String {
    format!("{}s", ms as f64 / 1000.0)
}

/// Milliseconds as minutes and seconds, e.g. `2m5s`
fn format_minutes(ms: i64) -> String {
    let secs = ms / 1000;
    format!("{}m{}s", secs / 60, secs % 60)
}

/// Value range mapped onto the drawing area
struct Plot {
    width: f64,
    height: f64,
    x_min: i64,
    x_max: i64,
    y_min: i64,
    y_max: i64,
}

impl Plot {
    fn new(config: &ChartConfig, x_range: (i64, i64), y_range: (i64, i64)) -> Self {
        let widen = |(lo, hi): (i64, i64)| match lo.checked_add(1) {
            _ if hi > lo => (lo, hi),
            Some(next) => (lo, next),
            None => (lo - 1, lo),
        };
        let (x_min, x_max) = widen(x_range);
        let (y_min, y_max) = widen(y_range);
        Self {
            width: config.width as f64,
            height: config.height as f64,
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn x(&self, value: i64) -> f64 {
        let span = (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        MARGIN_LEFT + fraction(value, self.x_min, self.x_max) * span
    }

    fn y(&self, value: i64) -> f64 {
        let span = (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        self.height - MARGIN_BOTTOM - fraction(value, self.y_min, self.y_max) * span
    }

    fn y_tick(&self, i: i64) -> i64 {
        tick(self.y_min, self.y_max, i)
    }

    fn x_tick(&self, i: i64) -> i64 {
        tick(self.x_min, self.x_max, i)
    }

    fn bottom(&self) -> f64 {
        self.height - MARGIN_BOTTOM
    }

    fn right(&self) -> f64 {
        self.width - MARGIN_RIGHT
    }
}

/// Position of `value` within `lo..=hi` as 0.0..=1.0
///
/// Widened to i128 so ranges spanning most of i64 do not overflow.
fn fraction(value: i64, lo: i64, hi: i64) -> f64 {
    (i128::from(value) - i128::from(lo)) as f64 / (i128::from(hi) - i128::from(lo)) as f64
}

/// Value of tick `i` out of `TICKS` evenly spaced over `lo..=hi`
fn tick(lo: i64, hi: i64, i: i64) -> i64 {
    let span = i128::from(hi) - i128::from(lo);
    let value = i128::from(lo) + span * i128::from(i) / i128::from(TICKS);
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Open the SVG element and draw background, title and subtitle
fn open_svg(out: &mut String, config: &ChartConfig, title: &str, subtitle: Option<&str>) {
    let theme = config.theme();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = config.height
    ));
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        config.width, config.height, theme.background
    ));
    out.push_str(&format!(
        r#"<text x="{}" y="24" font-size="16" font-weight="bold" text-anchor="middle" fill="{}">{}</text>"#,
        config.width / 2,
        theme.foreground,
        escape_xml(title)
    ));
    if let Some(subtitle) = subtitle {
        out.push_str(&format!(
            r#"<text x="{}" y="42" font-size="12" text-anchor="middle" fill="{}">{}</text>"#,
            config.width / 2,
            theme.foreground,
            escape_xml(subtitle)
        ));
    }
}

fn render_no_data(out: &mut String, config: &ChartConfig) {
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="{}">No data</text>"#,
        config.width / 2,
        config.height / 2,
        config.theme().foreground
    ));
}

/// Axes, grid lines and tick labels
fn render_axes(
    out: &mut String,
    plot: &Plot,
    theme: Theme,
    x_label: &str,
    y_label: &str,
    x_format: fn(i64) -> String,
    y_format: fn(i64) -> String,
) {
    for i in 0..=TICKS {
        let y_value = plot.y_tick(i);
        let y = plot.y(y_value);
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
            MARGIN_LEFT,
            y,
            plot.right(),
            y,
            theme.grid
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="11" text-anchor="end" fill="{}">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            theme.foreground,
            y_format(y_value)
        ));

        let x_value = plot.x_tick(i);
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
            plot.x(x_value),
            plot.bottom() + 16.0,
            theme.foreground,
            x_format(x_value)
        ));
    }

    out.push_str(&format!(
        r#"<line x1="{l:.2}" y1="{b:.2}" x2="{r:.2}" y2="{b:.2}" stroke="{c}"/><line x1="{l:.2}" y1="{t:.2}" x2="{l:.2}" y2="{b:.2}" stroke="{c}"/>"#,
        l = MARGIN_LEFT,
        r = plot.right(),
        t = MARGIN_TOP,
        b = plot.bottom(),
        c = theme.foreground
    ));
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle" fill="{}">{}</text>"#,
        (MARGIN_LEFT + plot.right()) / 2.0,
        plot.height - 10.0,
        theme.foreground,
        escape_xml(x_label)
    ));
    out.push_str(&format!(
        r#"<text x="14" y="{:.2}" font-size="12" text-anchor="middle" fill="{}" transform="rotate(-90 14 {:.2})">{}</text>"#,
        (MARGIN_TOP + plot.bottom()) / 2.0,
        theme.foreground,
        (MARGIN_TOP + plot.bottom()) / 2.0,
        escape_xml(y_label)
    ));
}

/// One named polyline with point tooltips
fn render_polyline(out: &mut String, plot: &Plot, color: &str, name: &str, points: &[(i64, i64, String)]) {
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y, _)| format!("{:.2},{:.2}", plot.x(*x), plot.y(*y)))
        .collect();

    out.push_str(&format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"><title>{}</title></polyline>"#,
        color,
        coords.join(" "),
        escape_xml(name)
    ));

    for (x, y, label) in points {
        out.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{}"><title>{} ({})</title></circle>"#,
            plot.x(*x),
            plot.y(*y),
            color,
            escape_xml(label),
            y
        ));
    }
}

fn render_legend(out: &mut String, names: &[&str], theme: Theme) {
    for (i, name) in names.iter().enumerate() {
        let x = MARGIN_LEFT + (i as f64 * 110.0);
        out.push_str(&format!(
            r#"<rect x="{:.2}" y="48" width="12" height="12" fill="{}" rx="2"/>"#,
            x,
            PALETTE[i % PALETTE.len()]
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="58" font-size="11" fill="{}">{}</text>"#,
            x + 16.0,
            theme.foreground,
            escape_xml(name)
        ));
    }
}

/// Total requests vs time, one line per category
pub fn render_requests_chart(series: &CategorySeries, config: &ChartConfig) -> Result<String, ChartError> {
    config.validate()?;

    let mut out = String::new();
    open_svg(&mut out, config, "Total requests vs time", None);

    if series.is_empty() {
        render_no_data(&mut out, config);
        out.push_str("</svg>");
        return Ok(out);
    }

    let y_max = series
        .totals()
        .values()
        .copied()
        .max()
        .unwrap_or(0);
    let plot = Plot::new(
        config,
        (0, series.max_elapsed_ms()),
        (0, i64::try_from(y_max).unwrap_or(i64::MAX)),
    );
    let theme = config.theme();
    render_axes(&mut out, &plot, theme, "Time", "Requests sent", format_seconds, |v| v.to_string());

    let names: Vec<&str> = series.categories.keys().map(String::as_str).collect();
    for (i, (name, points)) in series.categories.iter().enumerate() {
        let coords: Vec<(i64, i64, String)> = points
            .iter()
            .map(|p| {
                let total = i64::try_from(p.cumulative_requests).unwrap_or(i64::MAX);
                (p.elapsed_ms, total, p.id.clone())
            })
            .collect();
        render_polyline(&mut out, &plot, PALETTE[i % PALETTE.len()], name, &coords);
    }
    render_legend(&mut out, &names, theme);

    out.push_str("</svg>");
    Ok(out)
}

/// Slowest templates as floating bars from start to end offset
pub fn render_slowest_chart(ranking: &DurationRanking, config: &ChartConfig) -> Result<String, ChartError> {
    config.validate()?;

    let mut out = String::new();
    let title = format!("Top {} slow templates", ranking.entries.len());
    open_svg(&mut out, config, &title, Some("bar spans start to end offset"));

    if ranking.entries.is_empty() {
        render_no_data(&mut out, config);
        out.push_str("</svg>");
        return Ok(out);
    }

    let y_min = ranking.entries.iter().map(|e| e.start_offset_ms.min(e.end_offset_ms)).min().unwrap_or(0);
    let y_max = ranking.entries.iter().map(|e| e.start_offset_ms.max(e.end_offset_ms)).max().unwrap_or(0);
    let count = ranking.entries.len() as i64;
    let plot = Plot::new(config, (0, count), (y_min.min(0), y_max));
    let theme = config.theme();
    render_axes(&mut out, &plot, theme, "Templates (slowest first)", "Elapsed", |_| String::new(), format_minutes);

    let slot = (plot.x(1) - plot.x(0)).max(1.0);
    let bar_width = (slot * 0.7).max(1.0);

    for (i, entry) in ranking.entries.iter().enumerate() {
        let x = plot.x(i as i64) + (slot - bar_width) / 2.0;
        let top = plot.y(entry.start_offset_ms.max(entry.end_offset_ms));
        let bottom = plot.y(entry.start_offset_ms.min(entry.end_offset_ms));
        out.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{} ({} - {}, {}ms)</title></rect>"#,
            x,
            top,
            bar_width,
            (bottom - top).max(1.0),
            PALETTE[3],
            escape_xml(&entry.id),
            format_minutes(entry.start_offset_ms),
            format_minutes(entry.end_offset_ms),
            entry.duration_ms()
        ));
    }

    out.push_str("</svg>");
    Ok(out)
}

/// Events counted per interval bucket
pub fn render_interval_chart(histogram: &IntervalHistogram, config: &ChartConfig) -> Result<String, ChartError> {
    config.validate()?;

    let points: Vec<(i64, i64, String)> = histogram
        .buckets
        .iter()
        .map(|b| {
            let count = i64::try_from(b.count).unwrap_or(i64::MAX);
            (b.end_offset_ms, count, format_seconds(b.elapsed_ms))
        })
        .collect();

    render_bucket_chart(
        config,
        "Template execution per interval",
        histogram.interval_ms,
        "Finished templates",
        "Executions",
        &points,
    )
}

/// Active templates per interval bucket
pub fn render_concurrency_chart(series: &ConcurrencySeries, config: &ChartConfig) -> Result<String, ChartError> {
    config.validate()?;

    let points: Vec<(i64, i64, String)> = series
        .buckets
        .iter()
        .map(|b| (b.end_offset_ms, b.active, format_seconds(b.elapsed_ms)))
        .collect();

    render_bucket_chart(
        config,
        "Worker pool",
        series.interval_ms,
        "Total workers",
        "Concurrency",
        &points,
    )
}

fn render_bucket_chart(
    config: &ChartConfig,
    title: &str,
    interval_ms: i64,
    y_label: &str,
    name: &str,
    points: &[(i64, i64, String)],
) -> Result<String, ChartError> {
    let mut out = String::new();
    let subtitle = format!("Time interval: {}", format_seconds(interval_ms));
    open_svg(&mut out, config, title, Some(&subtitle));

    if points.is_empty() {
        render_no_data(&mut out, config);
        out.push_str("</svg>");
        return Ok(out);
    }

    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0).min(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);
    let plot = Plot::new(config, (0, x_max), (y_min, y_max));

    render_axes(&mut out, &plot, config.theme(), "Time intervals", y_label, format_seconds, |v| v.to_string());
    render_polyline(&mut out, &plot, PALETTE[0], name, points);

    out.push_str("</svg>");
    Ok(out)
}

/// Render all four charts into one standalone HTML page
///
/// **Public** - main entry point for chart output
pub fn render_page(charts: &ChartSet, config: &ChartConfig) -> Result<String, ChartError> {
    config.validate()?;
    info!("Rendering chart page '{}'", config.title);

    let sections = [
        (
            "Total requests count over time (for each protocol)",
            render_requests_chart(&charts.requests_over_time, config)?,
        ),
        (
            "Top slow templates (by time taken)",
            render_slowest_chart(&charts.slowest_templates, config)?,
        ),
        (
            "Templates finished per time interval",
            render_interval_chart(&charts.requests_per_interval, config)?,
        ),
        (
            "Concurrency (total workers) over time",
            render_concurrency_chart(&charts.concurrency, config)?,
        ),
    ];

    let theme = config.theme();
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape_xml(&config.title)));
    page.push_str(&format!(
        "<style>body {{ background: {bg}; color: {fg}; font-family: sans-serif; margin: 0; }} \
         main {{ display: flex; flex-direction: column; align-items: center; }} \
         section {{ margin-bottom: 50px; }} \
         .caption {{ font-size: 13px; opacity: 0.8; }}</style>\n",
        bg = theme.background,
        fg = theme.foreground
    ));
    page.push_str("</head>\n<body>\n<main>\n");
    page.push_str(&format!("<h1>{}</h1>\n", escape_xml(&config.title)));

    for (caption, svg) in &sections {
        page.push_str("<section>\n");
        page.push_str(&format!("<p class=\"caption\">{}</p>\n", escape_xml(caption)));
        page.push_str(svg);
        page.push_str("\n</section>\n");
    }

    page.push_str("</main>\n</body>\n</html>\n");

    debug!("Chart page rendered ({} bytes)", page.len());
    Ok(page)
}
