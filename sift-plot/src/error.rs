//! Error types for sift-plot

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    /// Curve construction, loading or config errors
    #[error(transparent)]
    Common(#[from] sift_common::Error),

    /// Drawing backend failure
    #[error("Plot error: {0}")]
    Plot(String),

    /// Unknown plot type, legend option or inconsistent plot options
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Plot(err.to_string())
    }
}
