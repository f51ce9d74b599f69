//! Scalar screening metrics
//!
//! Aggregates that are not a slice of a curve:
//! - Normalized loss: distance of the actual discovery order from the
//!   optimal order, relative to the worst order
//! - Time to discovery: screening position of each relevant record
//! - Average time to discovery

use crate::labels::LabelSequence;
use crate::{Error, Result};

/// Screening position at which a relevant record was found
///
/// `(record_id, position)` with a 1-based position.
pub type Discovery = (i64, usize);

/// Normalized loss in `[0, 1]`
///
/// 0 when every relevant record is screened first, 1 when every relevant
/// record is screened last. With `Ny` relevant of `Nx` records:
///
/// ```text
/// optimal = Ny * Nx - Ny * (Ny - 1) / 2
/// actual  = sum of the running relevant count over all records
/// loss    = (optimal - actual) / (Ny * (Nx - Ny))
/// ```
///
/// # Errors
/// `InvalidInput` when the labels hold no relevant or only relevant records.
pub fn loss(labels: &LabelSequence) -> Result<f64> {
    let (n, n_pos) = labels.require_both_classes()?;
    let (nx, ny) = (n as u64, n_pos as u64);

    let optimal_auc = ny * nx - ny * (ny - 1) / 2;
    let actual_auc: u64 = labels.cumulative().into_iter().map(|c| c as u64).sum();

    Ok((optimal_auc - actual_auc) as f64 / (ny * (nx - ny)) as f64)
}

/// Position (1-based) of every relevant record, in screening order
///
/// # Errors
/// `InvalidInput` when `record_ids` and `labels` differ in length.
pub fn time_to_discovery(record_ids: &[i64], labels: &[u8]) -> Result<Vec<Discovery>> {
    if record_ids.len() != labels.len() {
        return Err(Error::InvalidInput(format!(
            "{} record ids for {} labels",
            record_ids.len(),
            labels.len()
        )));
    }

    Ok(record_ids
        .iter()
        .zip(labels)
        .enumerate()
        .filter(|(_, (_, &label))| label == 1)
        .map(|(i, (&id, _))| (id, i + 1))
        .collect())
}

/// Mean discovery position
///
/// # Errors
/// `InvalidInput` when no relevant record was discovered.
pub fn average_time_to_discovery(discoveries: &[Discovery]) -> Result<f64> {
    if discoveries.is_empty() {
        return Err(Error::InvalidInput(
            "average time to discovery needs at least one relevant record".to_string(),
        ));
    }
    let total: usize = discoveries.iter().map(|&(_, position)| position).sum();
    Ok(total as f64 / discoveries.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loss_of(v: &[u8]) -> Result<f64> {
        loss(&LabelSequence::new(v.to_vec())?)
    }

    #[test]
    fn test_loss_extremes() {
        assert_eq!(loss_of(&[1, 0]).unwrap(), 0.0);
        assert_eq!(loss_of(&[0, 1]).unwrap(), 1.0);
        assert_eq!(loss_of(&[1, 1, 0, 0, 0]).unwrap(), 0.0);
        assert_eq!(loss_of(&[0, 0, 0, 1, 1]).unwrap(), 1.0);
    }

    #[test]
    fn test_loss_midpoint() {
        assert_eq!(loss_of(&[1, 0, 1]).unwrap(), 0.5);
    }

    #[test]
    fn test_loss_degenerate_inputs() {
        assert!(matches!(loss_of(&[0, 0, 0]), Err(Error::InvalidInput(_))));
        assert!(matches!(loss_of(&[0]), Err(Error::InvalidInput(_))));
        assert!(matches!(loss_of(&[1]), Err(Error::InvalidInput(_))));
        assert!(matches!(loss_of(&[1, 1, 1]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_loss_bounded_for_all_short_sequences() {
        // every binary sequence of length 2..=10 with both classes
        for len in 2..=10u32 {
            for bits in 0..(1u32 << len) {
                let v: Vec<u8> = (0..len).map(|i| ((bits >> i) & 1) as u8).collect();
                let ones = v.iter().filter(|&&b| b == 1).count();
                if ones == 0 || ones == v.len() {
                    continue;
                }
                let value = loss_of(&v).unwrap();
                assert!(
                    (0.0..=1.0).contains(&value),
                    "loss {} out of range for {:?}",
                    value,
                    v
                );
            }
        }
    }

    #[test]
    fn test_time_to_discovery() {
        let td = time_to_discovery(&[3, 2, 0, 1], &[1, 1, 0, 1]).unwrap();
        assert_eq!(td, vec![(3, 1), (2, 2), (1, 4)]);
    }

    #[test]
    fn test_time_to_discovery_no_relevant() {
        let td = time_to_discovery(&[5, 6], &[0, 0]).unwrap();
        assert!(td.is_empty());
    }

    #[test]
    fn test_time_to_discovery_length_mismatch() {
        assert!(time_to_discovery(&[1, 2, 3], &[1, 0]).is_err());
    }

    #[test]
    fn test_average_time_to_discovery() {
        let td = vec![(3, 1), (2, 2), (1, 4)];
        let atd = average_time_to_discovery(&td).unwrap();
        assert!((atd - 7.0 / 3.0).abs() < 1e-12);

        assert!(average_time_to_discovery(&[]).is_err());
    }
}
