//! sift-plot: step plots of screening curves
//!
//! Renders recall, WSS and ERF curves of one or more reviews to SVG, with
//! random and optimal reference lines on recall plots.

pub mod chart;
pub mod error;
pub mod legend;

pub use chart::{render_plot, step_points, PlotKind, PlotOptions};
pub use error::{PlotError, Result};
pub use legend::LegendOption;
