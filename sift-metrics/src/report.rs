//! Metrics report assembly and formatting
//!
//! **Purpose:** Compute the full set of screening metrics for one review and
//! present them as a terminal table or a JSON document.
//!
//! JSON layout:
//! ```json
//! {"version": "0.1.0", "data": {"items": [{"id": "recall", "title": "Recall", "value": [[0.1, 0.5]]}]}}
//! ```

use crate::settings::MetricsSettings;
use serde::{Deserialize, Serialize};
use sift_common::curves::Confusion;
use sift_common::labels::{normalize_source, LabelSequence};
use sift_common::metrics::{confusion_at, erf_at, recall_at, tnr_at, wss_at};
use sift_common::scalar::{average_time_to_discovery, loss, time_to_discovery};
use sift_common::state::LabelSource;
use sift_common::{Axes, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Value of one report item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    /// `[record_id, position]` pairs
    Discoveries(Vec<(i64, usize)>),
    /// `[threshold, value]` pairs
    Pairs(Vec<(f64, f64)>),
}

/// One metric with its identifier and display title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricItem {
    pub id: String,
    pub title: String,
    pub value: MetricValue,
}

impl MetricItem {
    fn new(id: &str, title: &str, value: MetricValue) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub items: Vec<MetricItem>,
}

/// Complete metrics report for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Report format version (crate version)
    pub version: String,

    pub data: ReportData,
}

impl MetricsReport {
    pub fn new(items: Vec<MetricItem>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data: ReportData { items },
        }
    }

    pub fn items(&self) -> &[MetricItem] {
        &self.data.items
    }

    /// Item by id ("recall", "wss", "loss", ...)
    pub fn item(&self, id: &str) -> Option<&MetricItem> {
        self.data.items.iter().find(|item| item.id == id)
    }

    /// Export report to a pretty-printed JSON file
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Import report from JSON file
    pub fn import_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report: MetricsReport = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// Write one report as an object, several as an array
pub fn export_reports<P: AsRef<Path>>(reports: &[MetricsReport], path: P) -> Result<()> {
    match reports {
        [single] => single.export_json(path),
        _ => {
            let json = serde_json::to_string_pretty(reports)?;
            let mut file = File::create(path)?;
            file.write_all(json.as_bytes())?;
            Ok(())
        }
    }
}

fn pairs<F>(thresholds: &[f64], metric: F) -> Result<MetricValue>
where
    F: Fn(f64) -> Result<f64>,
{
    thresholds
        .iter()
        .map(|&t| Ok((t, metric(t)?)))
        .collect::<Result<Vec<_>>>()
        .map(MetricValue::Pairs)
}

fn confusion_item(
    labels: &LabelSequence,
    kind: Confusion,
    thresholds: &[f64],
    axes: Axes,
) -> Result<MetricItem> {
    let value = pairs(thresholds, |t| confusion_at(labels, kind, t, axes))?;
    Ok(MetricItem::new(kind.id(), kind.display_name(), value))
}

/// Compute every metric of the report for one review
///
/// Labels are padded to the full review length before any curve is built.
/// Time to discovery reads the unpadded results table, since padding
/// records carry no identifier.
///
/// # Errors
/// `InvalidInput` when the review has no relevant record or only relevant
/// records, or when a threshold is not finite.
pub fn compute_metrics<S: LabelSource + ?Sized>(
    source: &S,
    settings: &MetricsSettings,
) -> Result<MetricsReport> {
    let labels = normalize_source(source, settings.priors)?;
    let axes = settings.axes;
    debug!(
        n = labels.len(),
        n_relevant = labels.n_relevant(),
        "Computing metrics"
    );

    let (record_ids, raw_labels) = source.results_table(settings.priors);
    let discoveries = time_to_discovery(&record_ids, &raw_labels)?;

    let mut items = vec![
        MetricItem::new(
            "recall",
            "Recall",
            pairs(&settings.recall, |t| recall_at(&labels, t, axes))?,
        ),
        MetricItem::new(
            "wss",
            "Work Saved over Sampling",
            pairs(&settings.wss, |t| wss_at(&labels, t, axes))?,
        ),
        MetricItem::new("loss", "Loss", MetricValue::Scalar(loss(&labels)?)),
        MetricItem::new(
            "erf",
            "Extra Relevant record Found",
            pairs(&settings.erf, |t| erf_at(&labels, t, axes))?,
        ),
        MetricItem::new(
            "atd",
            "Average time to discovery",
            MetricValue::Scalar(average_time_to_discovery(&discoveries)?),
        ),
        MetricItem::new(
            "td",
            "Time to discovery",
            MetricValue::Discoveries(discoveries),
        ),
    ];

    for &kind in Confusion::all_variants() {
        items.push(confusion_item(&labels, kind, &settings.cm, axes)?);
    }
    items.push(MetricItem::new(
        "tnr",
        "True Negative Rate (Specificity)",
        pairs(&settings.cm, |t| tnr_at(&labels, t, axes))?,
    ));

    Ok(MetricsReport::new(items))
}

/// CLI formatter for metrics reports
pub struct CliFormatter;

impl CliFormatter {
    /// Format a report as a two-column table headed by `name`
    pub fn format_report(report: &MetricsReport, name: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nMetrics: {}\n", name));
        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        for item in report.items() {
            match &item.value {
                MetricValue::Scalar(v) => {
                    output.push_str(&format!("{:<38} {:>8.3}\n", item.title, v));
                }
                MetricValue::Pairs(values) => {
                    for (t, v) in values {
                        let label = format!("{} @{}", item.title, t);
                        output.push_str(&format!("{:<38} {:>8}\n", label, Self::format_value(*v)));
                    }
                }
                MetricValue::Discoveries(values) => {
                    output.push_str(&format!(
                        "{:<38} {:>8}\n",
                        format!("{} (records)", item.title),
                        values.len()
                    ));
                }
            }
        }

        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        output
    }

    /// Whole numbers without decimals, fractions with three
    fn format_value(v: f64) -> String {
        if v.fract() == 0.0 {
            format!("{}", v as i64)
        } else {
            format!("{:.3}", v)
        }
    }
}
