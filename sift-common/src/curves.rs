//! Curve construction from label sequences
//!
//! Provides the step curves every screening metric is read from:
//! - Recall: relevant records found after screening each record
//! - WSS: records saved versus random order, per relevant-count level
//! - ERF: extra relevant records found versus random order
//! - Confusion counts (TP/FP/TN/FN) and the true negative rate,
//!   indexed by the number of relevant records found
//! - Random and optimal recall reference curves
//!
//! The random-order reference finds `round(nPos * k / n)` relevant records
//! after `k` screened records. Rounding is half-to-even.

use crate::labels::LabelSequence;
use crate::slice::insertion_point_left;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Axis scaling for curve builders
///
/// Relative axes (the default) divide counts by the relevant total or by
/// the record total; absolute axes keep raw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axes {
    #[serde(default)]
    pub x_absolute: bool,
    #[serde(default)]
    pub y_absolute: bool,
}

impl Axes {
    pub fn new(x_absolute: bool, y_absolute: bool) -> Self {
        Self {
            x_absolute,
            y_absolute,
        }
    }

    /// Both axes as fractions
    pub fn relative() -> Self {
        Self::default()
    }

    /// Both axes as counts
    pub fn absolute() -> Self {
        Self::new(true, true)
    }
}

/// A step curve: equal-length `x` (non-decreasing) and `y` sequences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Curve {
    /// Build a curve, checking lengths and that `x` is sorted ascending
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::InvalidInput(format!(
                "curve x has {} values but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(Error::InvalidInput(
                "curve x must be sorted ascending".to_string(),
            ));
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y)` pairs in order
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Confusion-matrix count tracked along the review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confusion {
    TruePositive,
    FalsePositive,
    TrueNegative,
    FalseNegative,
}

impl Confusion {
    pub fn all_variants() -> &'static [Confusion] {
        &[
            Confusion::TruePositive,
            Confusion::FalsePositive,
            Confusion::TrueNegative,
            Confusion::FalseNegative,
        ]
    }

    /// Short metric identifier ("tp", "fp", "tn", "fn")
    pub fn id(&self) -> &'static str {
        match self {
            Confusion::TruePositive => "tp",
            Confusion::FalsePositive => "fp",
            Confusion::TrueNegative => "tn",
            Confusion::FalseNegative => "fn",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Confusion::TruePositive => "True Positives",
            Confusion::FalsePositive => "False Positives",
            Confusion::TrueNegative => "True Negatives",
            Confusion::FalseNegative => "False Negatives",
        }
    }

    /// Count before any record has been screened
    pub fn initial_value(&self, n_relevant: usize, n_irrelevant: usize) -> usize {
        match self {
            Confusion::TruePositive | Confusion::FalsePositive => 0,
            Confusion::TrueNegative => n_irrelevant,
            Confusion::FalseNegative => n_relevant,
        }
    }
}

/// Expected relevant records found under random order after each record
///
/// Entry `i` is `round(n_pos * (i + 1) / n)`, rounded half to even, so the
/// last entry always equals `n_pos`.
pub fn random_found(n: usize, n_pos: usize) -> Vec<usize> {
    (1..=n).map(|k| round_half_even_ratio(n_pos * k, n)).collect()
}

/// `round(num / den)` with ties to even, in exact integer arithmetic
fn round_half_even_ratio(num: usize, den: usize) -> usize {
    let q = num / den;
    let twice_rem = 2 * (num % den);
    if twice_rem > den || (twice_rem == den && q % 2 == 1) {
        q + 1
    } else {
        q
    }
}

/// 0-based position at which each relevant count `1..=n_pos` is first reached
fn first_reached(found: &[usize], n_pos: usize) -> Vec<usize> {
    (1..=n_pos)
        .map(|k| insertion_point_left(found, &k))
        .collect()
}

/// x-axis `1..=len`, divided by `scale` unless absolute
fn index_axis(len: usize, absolute: bool, scale: usize) -> Vec<f64> {
    (1..=len)
        .map(|i| {
            if absolute {
                i as f64
            } else {
                i as f64 / scale as f64
            }
        })
        .collect()
}

fn scale_values(values: Vec<f64>, absolute: bool, scale: usize) -> Vec<f64> {
    if absolute {
        values
    } else {
        values.into_iter().map(|v| v / scale as f64).collect()
    }
}

/// Recall curve: relevant records found after each screened record
///
/// x = record count (fraction of n unless `x_absolute`),
/// y = relevant found (fraction of nPos unless `y_absolute`).
pub fn recall_curve(labels: &LabelSequence, axes: Axes) -> Result<Curve> {
    let (n, n_pos) = labels.require_both_classes()?;

    let x = index_axis(n, axes.x_absolute, n);
    let found = labels.cumulative().into_iter().map(|c| c as f64).collect();
    let y = scale_values(found, axes.y_absolute, n_pos);

    Curve::new(x, y)
}

/// Work saved over sampling, per relevant-count level
///
/// For each `k = 1..=nPos`, y is the number of records screened to reach `k`
/// relevant under random order minus the number actually screened.
/// x = k (fraction of nPos unless `x_absolute`), y fraction of n unless
/// `y_absolute`.
pub fn wss_curve(labels: &LabelSequence, axes: Axes) -> Result<Curve> {
    let (n, n_pos) = labels.require_both_classes()?;

    let when_found = first_reached(&labels.cumulative(), n_pos);
    let when_found_random = first_reached(&random_found(n, n_pos), n_pos);

    let saved = when_found_random
        .iter()
        .zip(&when_found)
        .map(|(&random, &actual)| random as f64 - actual as f64)
        .collect();

    let x = index_axis(n_pos, axes.x_absolute, n_pos);
    let y = scale_values(saved, axes.y_absolute, n);

    Curve::new(x, y)
}

/// Extra records found versus random order after each screened record
///
/// x = record count (fraction of n unless `x_absolute`), y = found minus
/// random expectation (fraction of nPos unless `y_absolute`).
pub fn erf_curve(labels: &LabelSequence, axes: Axes) -> Result<Curve> {
    let (n, n_pos) = labels.require_both_classes()?;

    let extra = labels
        .cumulative()
        .into_iter()
        .zip(random_found(n, n_pos))
        .map(|(found, random)| found as f64 - random as f64)
        .collect();

    let x = index_axis(n, axes.x_absolute, n);
    let y = scale_values(extra, axes.y_absolute, n_pos);

    Curve::new(x, y)
}

/// Confusion count at the moment the k-th relevant record was found
///
/// x = k for `k = 1..=nPos` (fraction of nPos unless `x_absolute`);
/// y is always a raw count.
pub fn confusion_curve(
    labels: &LabelSequence,
    kind: Confusion,
    x_absolute: bool,
) -> Result<Curve> {
    let (_, n_pos) = labels.require_both_classes()?;
    let n_irrelevant = labels.n_irrelevant();

    let tp = labels.cumulative();
    let y = first_reached(&tp, n_pos)
        .into_iter()
        .map(|i| {
            let screened = i + 1;
            let tp = tp[i];
            let fp = screened - tp;
            let value = match kind {
                Confusion::TruePositive => tp,
                Confusion::FalsePositive => fp,
                Confusion::TrueNegative => n_irrelevant - fp,
                Confusion::FalseNegative => n_pos - tp,
            };
            value as f64
        })
        .collect();

    Curve::new(index_axis(n_pos, x_absolute, n_pos), y)
}

/// True negative rate (specificity) at each relevant-count level
///
/// TN curve divided by the irrelevant total, rounded to 6 decimals.
pub fn tnr_curve(labels: &LabelSequence, x_absolute: bool) -> Result<Curve> {
    let tn = confusion_curve(labels, Confusion::TrueNegative, x_absolute)?;
    let n_irrelevant = labels.n_irrelevant() as f64;

    let y = tn
        .y()
        .iter()
        .map(|&v| round_to_decimals(v / n_irrelevant, 6))
        .collect();

    Curve::new(tn.x().to_vec(), y)
}

/// Round to `decimals` places, ties to even
fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn check_reference_size(n: usize, n_pos: usize) -> Result<()> {
    if n == 0 || n_pos == 0 || n_pos > n {
        return Err(Error::InvalidInput(format!(
            "reference curve needs 0 < n_relevant <= n_records (got {} of {})",
            n_pos, n
        )));
    }
    Ok(())
}

/// Random-order recall reference for `n` records holding `n_pos` relevant
pub fn random_recall_curve(n: usize, n_pos: usize, axes: Axes) -> Result<Curve> {
    check_reference_size(n, n_pos)?;

    let found = random_found(n, n_pos).into_iter().map(|c| c as f64).collect();
    Curve::new(
        index_axis(n, axes.x_absolute, n),
        scale_values(found, axes.y_absolute, n_pos),
    )
}

/// Best-possible recall: every relevant record screened first
pub fn optimal_recall_curve(n: usize, n_pos: usize, axes: Axes) -> Result<Curve> {
    check_reference_size(n, n_pos)?;

    let found = (1..=n).map(|k| k.min(n_pos) as f64).collect();
    Curve::new(
        index_axis(n, axes.x_absolute, n),
        scale_values(found, axes.y_absolute, n_pos),
    )
}
