//! sift-metrics: screening metrics reports
//!
//! Turns a review log into the metrics report (recall, WSS, loss, ERF,
//! time to discovery, confusion counts) and renders it as a terminal table
//! or JSON.

pub mod report;
pub mod settings;

pub use report::{
    compute_metrics, export_reports, CliFormatter, MetricItem, MetricValue, MetricsReport,
};
pub use settings::MetricsSettings;
