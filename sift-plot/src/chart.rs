//! Step-plot rendering
//!
//! **Purpose:** Draw one post-step line per review for the selected curve
//! kind, plus the random and optimal reference lines on recall plots.
//!
//! Reference lines are sized by the batch maxima: the longest review and
//! the largest relevant count.

use crate::error::{PlotError, Result};
use plotters::prelude::*;
use sift_common::config::PlotConfig;
use sift_common::curves::{
    erf_curve, optimal_recall_curve, random_recall_curve, recall_curve, wss_curve,
};
use sift_common::{Axes, Curve, LabelBatch, LabelSequence};
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Optimal reference line colour
const OPTIMAL_GREY: RGBColor = RGBColor(128, 128, 128);

/// Margin around the unit range of relative y-axes
const Y_MARGIN: f64 = 0.05;

/// Curve shown by a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Recall,
    Wss,
    Erf,
}

impl PlotKind {
    pub fn title(&self) -> &'static str {
        match self {
            PlotKind::Recall => "Recall",
            PlotKind::Wss => "WSS",
            PlotKind::Erf => "ERF",
        }
    }

    /// Build this kind's curve for one review
    pub fn curve(&self, labels: &LabelSequence, axes: Axes) -> sift_common::Result<Curve> {
        match self {
            PlotKind::Recall => recall_curve(labels, axes),
            PlotKind::Wss => wss_curve(labels, axes),
            PlotKind::Erf => erf_curve(labels, axes),
        }
    }

    pub fn x_desc(&self, axes: Axes) -> &'static str {
        match (self, axes.x_absolute) {
            (PlotKind::Wss, false) => "Recall",
            (PlotKind::Wss, true) => "Relevant records found",
            (_, false) => "Proportion of records screened",
            (_, true) => "Records screened",
        }
    }

    pub fn y_desc(&self, axes: Axes) -> &'static str {
        match (self, axes.y_absolute) {
            (PlotKind::Recall, false) => "Recall",
            (PlotKind::Recall, true) => "Relevant records found",
            (PlotKind::Wss, false) => "WSS",
            (PlotKind::Wss, true) => "Records saved",
            (PlotKind::Erf, false) => "ERF",
            (PlotKind::Erf, true) => "Extra relevant records found",
        }
    }

    /// Upper end of the x-axis
    fn x_max(&self, batch: &LabelBatch, axes: Axes) -> f64 {
        if !axes.x_absolute {
            return 1.0;
        }
        match self {
            PlotKind::Wss => batch.max_relevant() as f64,
            PlotKind::Recall | PlotKind::Erf => batch.max_len() as f64,
        }
    }

    /// Y-axis limits: the unit range, or the count scale, with 5% margins
    pub fn y_range(&self, batch: &LabelBatch, axes: Axes) -> Range<f64> {
        let scale = if !axes.y_absolute {
            1.0
        } else {
            match self {
                PlotKind::Wss => batch.max_len() as f64,
                PlotKind::Recall | PlotKind::Erf => batch.max_relevant() as f64,
            }
        };
        (-Y_MARGIN * scale)..((1.0 + Y_MARGIN) * scale)
    }
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "recall" => Ok(PlotKind::Recall),
            "wss" => Ok(PlotKind::Wss),
            "erf" => Ok(PlotKind::Erf),
            other => Err(PlotError::InvalidOption(format!(
                "unknown plot type '{}' (expected recall, wss or erf)",
                other
            ))),
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Rendering switches and layout
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub axes: Axes,

    /// Random-order reference line (recall plots)
    pub show_random: bool,

    /// Optimal-order reference line (recall plots)
    pub show_optimal: bool,

    pub show_legend: bool,

    /// One label per review; empty for unlabeled lines
    pub legend_labels: Vec<String>,

    /// Caption; the plot kind's title when `None`
    pub title: Option<String>,

    pub width: u32,
    pub height: u32,
}

impl PlotOptions {
    pub fn from_config(plot: &PlotConfig, axes: Axes) -> Self {
        Self {
            axes,
            show_random: plot.show_random,
            show_optimal: plot.show_optimal,
            show_legend: plot.show_legend,
            legend_labels: Vec::new(),
            title: None,
            width: plot.width,
            height: plot.height,
        }
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default(), Axes::relative())
    }
}

/// Explicit vertices of the post-step polyline through a curve
///
/// Each value holds until the next breakpoint:
/// `(x0, y0), (x1, y0), (x1, y1), (x2, y1), ...`
pub fn step_points(curve: &Curve) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(curve.len() * 2);
    let mut previous: Option<f64> = None;

    for (x, y) in curve.points() {
        if let Some(prev_y) = previous {
            points.push((x, prev_y));
        }
        points.push((x, y));
        previous = Some(y);
    }
    points
}

/// Render `kind` curves of every review in `batch` to an SVG file
///
/// # Errors
/// - `InvalidOption` for an empty batch or a legend label count that does
///   not match the batch
/// - `Common` when a review has no relevant or only relevant records
/// - `Plot` when the SVG backend fails
pub fn render_plot(
    kind: PlotKind,
    batch: &LabelBatch,
    options: &PlotOptions,
    output_path: &Path,
) -> Result<()> {
    if batch.is_empty() {
        return Err(PlotError::InvalidOption(
            "no label sequences to plot".to_string(),
        ));
    }
    if !options.legend_labels.is_empty() && options.legend_labels.len() != batch.len() {
        return Err(PlotError::InvalidOption(format!(
            "{} legend labels for {} reviews",
            options.legend_labels.len(),
            batch.len()
        )));
    }

    let axes = options.axes;
    let curves = batch
        .iter()
        .map(|labels| kind.curve(labels, axes))
        .collect::<sift_common::Result<Vec<_>>>()?;
    debug!("Built {} {} curve(s)", curves.len(), kind);

    let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = options.title.as_deref().unwrap_or(kind.title());
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..kind.x_max(batch, axes), kind.y_range(batch, axes))?;

    chart
        .configure_mesh()
        .x_desc(kind.x_desc(axes))
        .y_desc(kind.y_desc(axes))
        .draw()?;

    for (i, curve) in curves.iter().enumerate() {
        let color = Palette99::pick(i).mix(1.0);
        let series = chart.draw_series(LineSeries::new(step_points(curve), color))?;
        if let Some(label) = options.legend_labels.get(i) {
            series
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if kind == PlotKind::Recall {
        let (n, n_pos) = (batch.max_len(), batch.max_relevant());

        if options.show_random {
            let random = random_recall_curve(n, n_pos, axes)?;
            chart
                .draw_series(LineSeries::new(step_points(&random), BLACK))?
                .label("Random")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
        }
        if options.show_optimal {
            let optimal = optimal_recall_curve(n, n_pos, axes)?;
            chart
                .draw_series(LineSeries::new(step_points(&optimal), OPTIMAL_GREY))?
                .label("Optimal")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], OPTIMAL_GREY));
        }
    }

    if options.show_legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    info!("{} plot written to {}", kind, output_path.display());
    Ok(())
}
