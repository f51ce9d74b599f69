//! Point metrics: curves sliced at a threshold
//!
//! Each function builds the relevant curve and reads it at `threshold`.
//! Thresholds before the first breakpoint report the value before any
//! record was screened (0 for recall, WSS and ERF); thresholds past the
//! last breakpoint saturate to the final value.

use crate::curves::{self, Axes, Confusion};
use crate::labels::LabelSequence;
use crate::{Error, Result};

fn check_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() {
        return Err(Error::InvalidInput(format!(
            "threshold must be a finite number, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Recall after screening `threshold` records (fraction of n unless `x_absolute`)
pub fn recall_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    check_threshold(threshold)?;
    let curve = curves::recall_curve(labels, axes)?;
    Ok(curve.value_at(threshold).unwrap_or(0.0))
}

/// Work saved over sampling at recall level `threshold`
pub fn wss_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    check_threshold(threshold)?;
    let curve = curves::wss_curve(labels, axes)?;
    Ok(curve.value_at(threshold).unwrap_or(0.0))
}

/// Extra relevant records found after screening `threshold` records
pub fn erf_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    check_threshold(threshold)?;
    let curve = curves::erf_curve(labels, axes)?;
    Ok(curve.value_at(threshold).unwrap_or(0.0))
}

/// Confusion count when recall first reached `threshold`
///
/// Only `axes.x_absolute` applies; counts are never scaled.
pub fn confusion_at(
    labels: &LabelSequence,
    kind: Confusion,
    threshold: f64,
    axes: Axes,
) -> Result<f64> {
    check_threshold(threshold)?;
    let curve = curves::confusion_curve(labels, kind, axes.x_absolute)?;
    Ok(curve.value_at(threshold).unwrap_or_else(|| {
        kind.initial_value(labels.n_relevant(), labels.n_irrelevant()) as f64
    }))
}

pub fn tp_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    confusion_at(labels, Confusion::TruePositive, threshold, axes)
}

pub fn fp_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    confusion_at(labels, Confusion::FalsePositive, threshold, axes)
}

pub fn tn_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    confusion_at(labels, Confusion::TrueNegative, threshold, axes)
}

pub fn fn_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    confusion_at(labels, Confusion::FalseNegative, threshold, axes)
}

/// True negative rate when recall first reached `threshold`
///
/// 1.0 before the first relevant record.
pub fn tnr_at(labels: &LabelSequence, threshold: f64, axes: Axes) -> Result<f64> {
    check_threshold(threshold)?;
    let curve = curves::tnr_curve(labels, axes.x_absolute)?;
    Ok(curve.value_at(threshold).unwrap_or(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[u8]) -> LabelSequence {
        LabelSequence::new(v.to_vec()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_recall_small_data() {
        let l = labels(&[1, 1, 1, 0]);
        assert_close(recall_at(&l, 0.5, Axes::relative()).unwrap(), 0.66666667);
        assert_close(recall_at(&l, 2.0, Axes::new(true, false)).unwrap(), 0.66666667);
        assert_close(recall_at(&l, 2.0, Axes::absolute()).unwrap(), 2.0);
        assert_close(recall_at(&l, 0.5, Axes::new(false, true)).unwrap(), 2.0);
    }

    #[test]
    fn test_recall_max_values() {
        let l = labels(&[1, 1, 1, 0]);
        assert_close(recall_at(&l, 1.0, Axes::relative()).unwrap(), 1.0);
        assert_close(recall_at(&l, 4.0, Axes::new(true, false)).unwrap(), 1.0);
        assert_close(recall_at(&l, 4.0, Axes::absolute()).unwrap(), 3.0);
        assert_close(recall_at(&l, 1.0, Axes::new(false, true)).unwrap(), 3.0);
    }

    #[test]
    fn test_recall_min_values() {
        let l = labels(&[1, 1, 1, 0]);
        for axes in [
            Axes::relative(),
            Axes::absolute(),
            Axes::new(true, false),
            Axes::new(false, true),
        ] {
            assert_close(recall_at(&l, 0.0, axes).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_recall_out_of_range_thresholds() {
        let l = labels(&[1, 1, 1, 0]);
        assert_close(recall_at(&l, -1.0, Axes::relative()).unwrap(), 0.0);
        assert_close(recall_at(&l, 0.2, Axes::new(true, false)).unwrap(), 0.0);
        assert_close(recall_at(&l, 6.0, Axes::new(true, false)).unwrap(), 1.0);
        assert_close(recall_at(&l, 1.2, Axes::relative()).unwrap(), 1.0);
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let l = labels(&[1, 0]);
        assert!(recall_at(&l, f64::NAN, Axes::relative()).is_err());
        assert!(wss_at(&l, f64::INFINITY, Axes::relative()).is_err());
    }

    #[test]
    fn test_wss_and_erf_points() {
        let l = labels(&[1, 0, 1, 1, 0]);
        assert_close(wss_at(&l, 1.0, Axes::relative()).unwrap(), 0.2);
        assert_close(wss_at(&l, 3.0, Axes::absolute()).unwrap(), 1.0);
        assert_close(wss_at(&l, 0.1, Axes::relative()).unwrap(), 0.0);
        assert_close(erf_at(&l, 4.0, Axes::absolute()).unwrap(), 1.0);
        assert_close(erf_at(&l, 0.8, Axes::relative()).unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn test_confusion_points() {
        let l = labels(&[1, 0, 1, 1, 0]);
        assert_close(tp_at(&l, 1.0, Axes::relative()).unwrap(), 3.0);
        assert_close(fp_at(&l, 1.0, Axes::relative()).unwrap(), 1.0);
        assert_close(tn_at(&l, 1.0, Axes::relative()).unwrap(), 1.0);
        assert_close(fn_at(&l, 1.0, Axes::relative()).unwrap(), 0.0);
        assert_close(tnr_at(&l, 1.0, Axes::relative()).unwrap(), 0.5);

        // 0.5 of 3 relevant: the first relevant record is the last at or below
        assert_close(tp_at(&l, 0.5, Axes::relative()).unwrap(), 1.0);
        assert_close(fn_at(&l, 2.0, Axes::new(true, false)).unwrap(), 1.0);
    }

    #[test]
    fn test_confusion_before_first_relevant() {
        let l = labels(&[0, 1, 0, 1]);
        assert_close(tp_at(&l, 0.1, Axes::relative()).unwrap(), 0.0);
        assert_close(fp_at(&l, 0.1, Axes::relative()).unwrap(), 0.0);
        assert_close(tn_at(&l, 0.1, Axes::relative()).unwrap(), 2.0);
        assert_close(fn_at(&l, 0.1, Axes::relative()).unwrap(), 2.0);
        assert_close(tnr_at(&l, 0.1, Axes::relative()).unwrap(), 1.0);
    }

    #[test]
    fn test_tnr_within_unit_interval() {
        let l = labels(&[0, 0, 1, 0, 1, 1, 0, 0, 0, 1]);
        for t in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let v = tnr_at(&l, t, Axes::relative()).unwrap();
            assert!((0.0..=1.0).contains(&v), "tnr {} at {}", v, t);
        }
    }
}
