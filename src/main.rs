//! Template Charts CLI
//!
//! Renders request, slow-template, throughput and concurrency charts
//! from a template execution stats file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use template_charts::chart::ChartConfig;
use template_charts::commands::{
    display_schema, display_version, execute_render, validate_args, validate_stats_file, RenderArgs,
};
use template_charts::utils::config::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_TOP_K, STATS_FILE_ENV,
};

/// Template Charts - visualize template execution logs
#[derive(Parser, Debug)]
#[command(name = "template-charts")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the chart series and write them out
    Render {
        /// Stats file to read events from
        #[arg(short, long, env = STATS_FILE_ENV, default_value = "stats.json")]
        input: PathBuf,

        /// Output path for the HTML chart page
        #[arg(short, long, default_value = "charts.html")]
        output: PathBuf,

        /// Skip the HTML chart page
        #[arg(long)]
        no_page: bool,

        /// Output path for a JSON report of the series (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Bucket width for the interval charts (e.g. 1s, 500ms)
        #[arg(long, default_value = "1s")]
        interval: String,

        /// Number of slowest templates to rank
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Chart width in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
        width: usize,

        /// Chart height in pixels
        #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
        height: usize,

        /// Use a light background
        #[arg(long)]
        light: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a stats file and report pairing problems
    Validate {
        /// Path to stats JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Render {
            input,
            output,
            no_page,
            json,
            interval,
            top_k,
            title,
            width,
            height,
            light,
            summary,
        } => {
            let mut chart_config = ChartConfig::new()
                .with_width(width)
                .with_height(height)
                .with_dark(!light);
            if let Some(title) = title {
                chart_config = chart_config.with_title(title);
            }

            let args = RenderArgs {
                input,
                output_html: (!no_page).then_some(output),
                output_json: json,
                interval,
                top_k,
                chart_config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_render(args)?;
        }

        Commands::Validate { file } => {
            validate_stats_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
