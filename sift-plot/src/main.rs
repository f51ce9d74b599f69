//! sift-plot - step plots of recall, WSS and ERF curves
//!
//! **Usage:**
//! ```bash
//! sift-plot <recall|wss|erf> <files or dirs...> -o plot.svg [--priors]
//!           [--x-absolute] [--y-absolute] [--no-random] [--no-optimal]
//!           [--legend filename|model|classifier] [--config sift.toml]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sift_common::config::SiftConfig;
use sift_common::labels::normalize_batch;
use sift_common::state::{collect_state_files, load_review_log};
use sift_common::Axes;
use sift_plot::{render_plot, LegendOption, PlotKind, PlotOptions};
use std::path::PathBuf;
use tracing::info;

/// Plot screening curves of one or more review logs
#[derive(Parser, Debug)]
#[clap(name = "sift-plot")]
#[clap(about = "Plot recall, WSS or ERF step curves of screening reviews to SVG")]
struct Args {
    /// Plot type: recall, wss or erf
    #[clap(value_name = "TYPE")]
    kind: String,

    /// Review logs (JSON or SQLite state files) or directories holding them
    #[clap(required = true, value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Output SVG file
    #[clap(short = 'o', long, value_name = "FILE")]
    output: PathBuf,

    /// Include prior records
    #[clap(long)]
    priors: bool,

    /// Absolute x-axis (record counts instead of fractions)
    #[clap(long)]
    x_absolute: bool,

    /// Absolute y-axis (record counts instead of fractions)
    #[clap(long)]
    y_absolute: bool,

    /// Hide the random-order reference line
    #[clap(long)]
    no_random: bool,

    /// Hide the optimal-order reference line
    #[clap(long)]
    no_optimal: bool,

    /// Show a legend labeled by filename, model or classifier
    #[clap(long, value_name = "SOURCE")]
    legend: Option<String>,

    /// Configuration file (overrides SIFT_CONFIG)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = SiftConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting SIFT plot (sift-plot) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let kind: PlotKind = args.kind.parse()?;
    let legend: LegendOption = args
        .legend
        .as_deref()
        .unwrap_or(&config.plot.legend)
        .parse()?;

    let axes = Axes::new(
        config.axes.x_absolute || args.x_absolute,
        config.axes.y_absolute || args.y_absolute,
    );
    let priors = config.axes.priors || args.priors;

    let mut options = PlotOptions::from_config(&config.plot, axes);
    options.show_random &= !args.no_random;
    options.show_optimal &= !args.no_optimal;
    options.show_legend |= args.legend.is_some();

    let files = collect_state_files(&args.files).context("Failed to collect state files")?;
    let mut logs = Vec::with_capacity(files.len());
    for path in &files {
        let log = load_review_log(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        options.legend_labels.push(legend.label(path, &log));
        logs.push(log);
    }

    let batch = normalize_batch(&logs, priors).context("Failed to normalize labels")?;
    info!("Plotting {} of {} review(s)", kind, batch.len());

    render_plot(kind, &batch, &options, &args.output)
        .with_context(|| format!("Failed to render {}", args.output.display()))?;

    println!("Plot written to: {}", args.output.display());
    Ok(())
}
