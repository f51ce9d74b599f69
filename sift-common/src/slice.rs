//! Threshold slicing of step curves
//!
//! **Purpose:** Turn a curve into a point metric by reading the step function
//! at a query threshold, plus the insertion-point searches the curve builders
//! use to locate when the k-th relevant record was found.
//!
//! Curves are right-continuous step functions: the value at `t` is `y[j]`
//! where `j` is the last index with `x[j] <= t`.

use crate::curves::Curve;
use crate::{Error, Result};

/// Number of elements of a sorted slice that are `<= value`
///
/// Right-biased insertion point (`searchsorted(side="right")`).
pub fn insertion_point_right<T: PartialOrd>(sorted: &[T], value: &T) -> usize {
    sorted.partition_point(|v| v <= value)
}

/// Index of the first element of a sorted slice that is `>= value`
///
/// Left-biased insertion point (`searchsorted(side="left")`). On a
/// non-decreasing running count this is the first position reaching
/// `value`, so repeated counts resolve to their first occurrence.
pub fn insertion_point_left<T: PartialOrd>(sorted: &[T], value: &T) -> usize {
    sorted.partition_point(|v| v < value)
}

/// Read the step function `(x, y)` at `threshold`
///
/// Returns `Ok(None)` when the threshold lies before the first breakpoint;
/// metric callers report 0 there. Thresholds beyond the last breakpoint
/// saturate to the last value.
///
/// # Errors
/// `InvalidInput` when the slices differ in length or `x` is not sorted.
pub fn slice_at(x: &[f64], y: &[f64], threshold: f64) -> Result<Option<f64>> {
    if x.len() != y.len() {
        return Err(Error::InvalidInput(format!(
            "curve x has {} values but y has {}",
            x.len(),
            y.len()
        )));
    }
    if let Some(i) = x.windows(2).position(|w| !(w[0] <= w[1])) {
        return Err(Error::InvalidInput(format!(
            "curve x must be sorted ascending (x[{}] = {} > x[{}] = {})",
            i,
            x[i],
            i + 1,
            x[i + 1]
        )));
    }
    Ok(step_lookup(x, y, threshold))
}

fn step_lookup(x: &[f64], y: &[f64], threshold: f64) -> Option<f64> {
    match insertion_point_right(x, &threshold) {
        0 => None,
        j => Some(y[j - 1]),
    }
}

impl Curve {
    /// Value of the step function at `threshold`, `None` before the first breakpoint
    pub fn value_at(&self, threshold: f64) -> Option<f64> {
        step_lookup(self.x(), self.y(), threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_points() {
        let xs = [1, 1, 2, 2, 2, 3];
        assert_eq!(insertion_point_left(&xs, &2), 2);
        assert_eq!(insertion_point_right(&xs, &2), 5);
        assert_eq!(insertion_point_left(&xs, &0), 0);
        assert_eq!(insertion_point_right(&xs, &0), 0);
        assert_eq!(insertion_point_left(&xs, &4), 6);
        assert_eq!(insertion_point_right(&xs, &4), 6);
    }

    #[test]
    fn test_slice_exact_breakpoint() {
        let x = [0.25, 0.5, 0.75, 1.0];
        let y = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(slice_at(&x, &y, 0.5).unwrap(), Some(20.0));
    }

    #[test]
    fn test_slice_between_breakpoints_holds_previous_value() {
        let x = [0.25, 0.5, 0.75, 1.0];
        let y = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(slice_at(&x, &y, 0.6).unwrap(), Some(20.0));
    }

    #[test]
    fn test_slice_below_range() {
        let x = [1.0, 2.0];
        let y = [5.0, 6.0];
        assert_eq!(slice_at(&x, &y, 0.5).unwrap(), None);
        assert_eq!(slice_at(&x, &y, -3.0).unwrap(), None);
    }

    #[test]
    fn test_slice_above_range_saturates() {
        let x = [1.0, 2.0];
        let y = [5.0, 6.0];
        assert_eq!(slice_at(&x, &y, 100.0).unwrap(), Some(6.0));
    }

    #[test]
    fn test_slice_unsorted_fails() {
        let x = [1.0, 3.0, 2.0];
        let y = [0.0, 0.0, 0.0];
        assert!(matches!(slice_at(&x, &y, 2.5), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_slice_length_mismatch_fails() {
        assert!(matches!(
            slice_at(&[1.0, 2.0], &[1.0], 1.5),
            Err(Error::InvalidInput(_))
        ));
    }
}
