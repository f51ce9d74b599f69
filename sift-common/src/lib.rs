//! # SIFT Common Library
//!
//! Shared code for the SIFT screening-insight tools including:
//! - Label sequence normalization (padding early-stopped reviews)
//! - Curve construction (recall, WSS, ERF, confusion counts)
//! - Threshold slicing of step curves
//! - Scalar metrics (loss, time to discovery)
//! - Review-log loading (JSON and SQLite state files)
//! - Configuration loading

pub mod config;
pub mod curves;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod scalar;
pub mod slice;
pub mod state;

pub use curves::{Axes, Curve};
pub use error::{Error, Result};
pub use labels::{LabelBatch, LabelSequence};
