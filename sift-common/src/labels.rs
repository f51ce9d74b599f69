//! Label sequences and normalization
//!
//! A [`LabelSequence`] is the ordered list of relevance labels (0 = irrelevant,
//! 1 = relevant) in the order records were screened. Every curve and scalar
//! metric consumes one.
//!
//! Reviews that stopped early record fewer labels than the dataset holds.
//! Normalization right-pads such sequences with zeros up to the number of
//! records under consideration, so unscreened records count as not found.

use crate::state::LabelSource;
use crate::{Error, Result};
use tracing::debug;

/// Ordered binary relevance labels, one entry per screened record
///
/// Always non-empty and strictly binary; both are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSequence(Vec<u8>);

impl LabelSequence {
    /// Build a sequence, rejecting empty input and values other than 0 or 1
    pub fn new(labels: Vec<u8>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::InvalidInput(
                "label sequence must contain at least one record".to_string(),
            ));
        }
        if let Some((i, v)) = labels.iter().enumerate().find(|(_, &v)| v > 1) {
            return Err(Error::InvalidInput(format!(
                "label at position {} is {}, expected 0 or 1",
                i + 1,
                v
            )));
        }
        Ok(Self(labels))
    }

    /// Build a sequence from boolean relevance flags
    pub fn from_bools(labels: &[bool]) -> Result<Self> {
        Self::new(labels.iter().map(|&l| u8::from(l)).collect())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of screened records (n)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of relevant records (nPos)
    pub fn n_relevant(&self) -> usize {
        self.0.iter().map(|&l| l as usize).sum()
    }

    /// Number of irrelevant records (n - nPos)
    pub fn n_irrelevant(&self) -> usize {
        self.len() - self.n_relevant()
    }

    /// Running count of relevant records found through each position
    pub fn cumulative(&self) -> Vec<usize> {
        self.0
            .iter()
            .scan(0usize, |found, &l| {
                *found += l as usize;
                Some(*found)
            })
            .collect()
    }

    /// Returns `(n, nPos)` when the sequence holds both classes
    ///
    /// Curves and metrics divide by nPos and by n - nPos, so a sequence
    /// without relevant records or without irrelevant records is rejected.
    pub fn require_both_classes(&self) -> Result<(usize, usize)> {
        let n = self.len();
        let n_pos = self.n_relevant();
        if n_pos == 0 {
            return Err(Error::InvalidInput(format!(
                "labels contain no relevant records (n = {})",
                n
            )));
        }
        if n_pos == n {
            return Err(Error::InvalidInput(format!(
                "labels contain only relevant records (n = {})",
                n
            )));
        }
        Ok((n, n_pos))
    }
}

impl TryFrom<Vec<u8>> for LabelSequence {
    type Error = Error;

    fn try_from(labels: Vec<u8>) -> Result<Self> {
        Self::new(labels)
    }
}

impl AsRef<[u8]> for LabelSequence {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Pad recorded labels to the full review length
///
/// The target length is `n_records` when priors are included and
/// `n_records - n_priors` otherwise. Shorter input is right-padded with
/// zeros; input at or beyond the target length is kept as is.
pub fn normalize_labels(
    raw: &[u8],
    n_records: usize,
    n_priors: usize,
    include_priors: bool,
) -> Result<LabelSequence> {
    let target = if include_priors {
        n_records
    } else {
        n_records.saturating_sub(n_priors)
    };

    let mut labels = raw.to_vec();
    if labels.len() < target {
        debug!(
            recorded = labels.len(),
            target, "Padding early-stopped review with irrelevant labels"
        );
        labels.resize(target, 0);
    }

    LabelSequence::new(labels)
}

/// Normalize the labels held by a review-log collaborator
pub fn normalize_source<S: LabelSource + ?Sized>(
    source: &S,
    include_priors: bool,
) -> Result<LabelSequence> {
    normalize_labels(
        &source.labels(include_priors),
        source.n_records(),
        source.n_priors(),
        include_priors,
    )
}

/// Several label sequences analysed together (e.g. overlaid runs)
///
/// A single run is a batch of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelBatch(Vec<LabelSequence>);

impl LabelBatch {
    pub fn new(sequences: Vec<LabelSequence>) -> Self {
        Self(sequences)
    }

    pub fn single(sequence: LabelSequence) -> Self {
        Self(vec![sequence])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelSequence> {
        self.0.iter()
    }

    /// Longest sequence length, sizes the shared x-axis of reference curves
    pub fn max_len(&self) -> usize {
        self.0.iter().map(LabelSequence::len).max().unwrap_or(0)
    }

    /// Largest relevant count, sizes the shared y-axis of reference curves
    pub fn max_relevant(&self) -> usize {
        self.0
            .iter()
            .map(LabelSequence::n_relevant)
            .max()
            .unwrap_or(0)
    }
}

impl FromIterator<LabelSequence> for LabelBatch {
    fn from_iter<I: IntoIterator<Item = LabelSequence>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LabelBatch {
    type Item = &'a LabelSequence;
    type IntoIter = std::slice::Iter<'a, LabelSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize every source independently into one batch
pub fn normalize_batch<'a, S, I>(sources: I, include_priors: bool) -> Result<LabelBatch>
where
    S: LabelSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    sources
        .into_iter()
        .map(|s| normalize_source(s, include_priors))
        .collect()
}
