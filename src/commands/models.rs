use crate::chart::ChartConfig;
use crate::output::default_stats_path;
use crate::utils::config::DEFAULT_TOP_K;
use std::path::PathBuf;

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Stats file holding the event log
    pub input: PathBuf,

    /// Output path for the HTML chart page (optional)
    pub output_html: Option<PathBuf>,

    /// Output path for the JSON chart report (optional)
    pub output_json: Option<PathBuf>,

    /// Bucketing interval as given on the command line
    pub interval: String,

    /// Number of slowest templates to rank
    pub top_k: usize,

    /// Chart page configuration
    pub chart_config: ChartConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            input: default_stats_path(),
            output_html: Some(PathBuf::from("charts.html")),
            output_json: None,
            interval: "1s".to_string(),
            top_k: DEFAULT_TOP_K,
            chart_config: ChartConfig::default(),
            print_summary: false,
        }
    }
}
