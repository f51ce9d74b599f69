//! sift-metrics - screening metrics for review logs
//!
//! **Usage:**
//! ```bash
//! sift-metrics <files or dirs...> [-o report.json] [--recall 0.1,0.5] [--wss 0.95]
//!              [--erf 0.1] [--cm 0.5] [--priors] [--x-absolute] [--y-absolute]
//!              [--config sift.toml]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sift_common::config::SiftConfig;
use sift_common::state::{collect_state_files, load_review_log};
use sift_common::Axes;
use sift_metrics::{compute_metrics, export_reports, CliFormatter, MetricsSettings};
use std::path::{Path, PathBuf};
use tracing::info;

/// Compute screening metrics for one or more review logs
#[derive(Parser, Debug)]
#[clap(name = "sift-metrics")]
#[clap(about = "Compute recall, WSS, ERF, loss and confusion metrics for screening reviews")]
struct Args {
    /// Review logs (JSON or SQLite state files) or directories holding them
    #[clap(required = true, value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Export results to JSON file
    #[clap(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Recall thresholds (records screened)
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    recall: Option<Vec<f64>>,

    /// WSS thresholds (recall levels)
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    wss: Option<Vec<f64>>,

    /// ERF thresholds (records screened)
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    erf: Option<Vec<f64>>,

    /// Confusion-matrix thresholds (recall levels)
    #[clap(long, value_delimiter = ',', num_args = 1..)]
    cm: Option<Vec<f64>>,

    /// Include prior records
    #[clap(long)]
    priors: bool,

    /// Absolute x-axis (record counts instead of fractions)
    #[clap(long)]
    x_absolute: bool,

    /// Absolute y-axis (record counts instead of fractions)
    #[clap(long)]
    y_absolute: bool,

    /// Configuration file (overrides SIFT_CONFIG)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    /// Config values with command-line overrides applied
    fn settings(&self, config: &SiftConfig) -> MetricsSettings {
        let mut settings = MetricsSettings::from_config(config);
        if let Some(recall) = &self.recall {
            settings.recall = recall.clone();
        }
        if let Some(wss) = &self.wss {
            settings.wss = wss.clone();
        }
        if let Some(erf) = &self.erf {
            settings.erf = erf.clone();
        }
        if let Some(cm) = &self.cm {
            settings.cm = cm.clone();
        }
        settings.priors |= self.priors;
        settings.axes = Axes::new(
            settings.axes.x_absolute || self.x_absolute,
            settings.axes.y_absolute || self.y_absolute,
        );
        settings
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = SiftConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the report tables
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting SIFT metrics (sift-metrics) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let settings = args.settings(&config);
    let files = collect_state_files(&args.files).context("Failed to collect state files")?;
    info!("Computing metrics for {} state file(s)", files.len());

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        let log = load_review_log(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let report = compute_metrics(&log, &settings)
            .with_context(|| format!("Failed to compute metrics for {}", path.display()))?;

        println!("{}", CliFormatter::format_report(&report, &display_name(path)));
        reports.push(report);
    }

    if let Some(output) = &args.output {
        export_reports(&reports, output)
            .with_context(|| format!("Failed to export results to {}", output.display()))?;
        info!("Results exported to: {}", output.display());
    }

    Ok(())
}
