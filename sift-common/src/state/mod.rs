//! Review logs: the records screened, in order, with their labels
//!
//! The metric core only needs an ordered label sequence and the dataset
//! size. [`LabelSource`] is that boundary; [`ReviewLog`] is the in-memory
//! snapshot the loaders produce and the binaries hand to the core.
//!
//! Two on-disk forms are read:
//! - JSON review logs (`{"n_records": .., "results": [..]}`)
//! - SQLite reviewed-state databases (`results` and `record_table` tables),
//!   behind the `sqlx` feature

#[cfg(feature = "sqlx")]
mod sqlite;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Query strategy value that marks a prior (seed) record
pub const PRIOR_QUERY_STRATEGY: &str = "prior";

/// File extensions picked up when a directory is given
pub const STATE_FILE_EXTENSIONS: &[&str] = &["json", "sqlite", "db"];

/// Supplier of labels for metric computation
pub trait LabelSource {
    /// Total number of records in the dataset
    fn n_records(&self) -> usize;

    /// Number of prior (seed) records among the labeled ones
    fn n_priors(&self) -> usize;

    /// Labels in screening order, optionally including priors
    fn labels(&self, include_priors: bool) -> Vec<u8>;

    /// Record ids paired with labels, in screening order
    fn results_table(&self, include_priors: bool) -> (Vec<i64>, Vec<u8>);

    /// Model settings of the review, when recorded
    fn settings(&self) -> Option<ModelSettings>;
}

/// One labeled record of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedRecord {
    pub record_id: i64,
    pub label: u8,
    #[serde(default)]
    pub query_strategy: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub feature_extraction: Option<String>,
    #[serde(default)]
    pub balance_strategy: Option<String>,
}

impl ReviewedRecord {
    pub fn is_prior(&self) -> bool {
        self.query_strategy.as_deref() == Some(PRIOR_QUERY_STRATEGY)
    }
}

/// Active-learning model settings, used for legend labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub classifier: String,
    pub feature_extraction: String,
    pub balance_strategy: String,
    pub query_strategy: String,
}

impl ModelSettings {
    /// "classifier - feature_extraction - balance_strategy - query_strategy"
    pub fn model_name(&self) -> String {
        [
            self.classifier.as_str(),
            self.feature_extraction.as_str(),
            self.balance_strategy.as_str(),
            self.query_strategy.as_str(),
        ]
        .join(" - ")
    }
}

/// Raw JSON row; unlabeled rows carry a null label
#[derive(Debug, Deserialize)]
struct JsonRow {
    record_id: i64,
    #[serde(default)]
    label: Option<i64>,
    #[serde(default)]
    query_strategy: Option<String>,
    #[serde(default)]
    classifier: Option<String>,
    #[serde(default)]
    feature_extraction: Option<String>,
    #[serde(default)]
    balance_strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonLog {
    n_records: usize,
    #[serde(default)]
    results: Vec<JsonRow>,
}

/// Ordered snapshot of a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewLog {
    n_records: usize,
    records: Vec<ReviewedRecord>,
}

impl ReviewLog {
    /// Build a log from labeled records in screening order
    ///
    /// # Errors
    /// `InvalidInput` when a label is not 0 or 1.
    pub fn new(n_records: usize, records: Vec<ReviewedRecord>) -> Result<Self> {
        if let Some(bad) = records.iter().find(|r| r.label > 1) {
            return Err(Error::InvalidInput(format!(
                "record {} has label {}, expected 0 or 1",
                bad.record_id, bad.label
            )));
        }
        Ok(Self { n_records, records })
    }

    /// Log from bare labels, record ids numbered from 0 and no priors
    pub fn from_labels(n_records: usize, labels: &[u8]) -> Result<Self> {
        let records = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| ReviewedRecord {
                record_id: i as i64,
                label,
                query_strategy: None,
                classifier: None,
                feature_extraction: None,
                balance_strategy: None,
            })
            .collect();
        Self::new(n_records, records)
    }

    /// Parse a JSON review log
    pub fn from_json_str(content: &str) -> Result<Self> {
        let log: JsonLog = serde_json::from_str(content)?;
        let records = log
            .results
            .into_iter()
            .filter_map(|row| {
                let label = row.label?;
                Some((row, label))
            })
            .map(|(row, label)| {
                let label = u8::try_from(label)
                    .ok()
                    .filter(|&l| l <= 1)
                    .ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "record {} has label {}, expected 0 or 1",
                            row.record_id, label
                        ))
                    })?;
                Ok(ReviewedRecord {
                    record_id: row.record_id,
                    label,
                    query_strategy: row.query_strategy,
                    classifier: row.classifier,
                    feature_extraction: row.feature_extraction,
                    balance_strategy: row.balance_strategy,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(log.n_records, records)
    }

    /// Read a JSON review log from disk
    pub fn from_json_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "review log {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let log = Self::from_json_str(&content)?;
        info!(
            "Loaded JSON review log {} ({} labeled of {} records)",
            path.display(),
            log.records.len(),
            log.n_records
        );
        Ok(log)
    }

    pub fn records(&self) -> &[ReviewedRecord] {
        &self.records
    }

    fn iter_included(&self, include_priors: bool) -> impl Iterator<Item = &ReviewedRecord> {
        self.records
            .iter()
            .filter(move |r| include_priors || !r.is_prior())
    }
}

impl LabelSource for ReviewLog {
    fn n_records(&self) -> usize {
        self.n_records
    }

    fn n_priors(&self) -> usize {
        self.records.iter().filter(|r| r.is_prior()).count()
    }

    fn labels(&self, include_priors: bool) -> Vec<u8> {
        self.iter_included(include_priors).map(|r| r.label).collect()
    }

    fn results_table(&self, include_priors: bool) -> (Vec<i64>, Vec<u8>) {
        self.iter_included(include_priors)
            .map(|r| (r.record_id, r.label))
            .unzip()
    }

    fn settings(&self) -> Option<ModelSettings> {
        let first = self.records.iter().find(|r| !r.is_prior())?;
        Some(ModelSettings {
            classifier: first.classifier.clone()?,
            feature_extraction: first.feature_extraction.clone().unwrap_or_default(),
            balance_strategy: first.balance_strategy.clone().unwrap_or_default(),
            query_strategy: first.query_strategy.clone().unwrap_or_default(),
        })
    }
}

/// Expand paths into state files
///
/// A directory contributes its files with a known state extension, sorted
/// by name; a file is taken as given.
///
/// # Errors
/// `NotFound` when a path does not exist or nothing was collected.
pub fn collect_state_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && has_state_extension(p))
                .collect();
            entries.sort();
            debug!("{} state files in {}", entries.len(), path.display());
            files.extend(entries);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(Error::NotFound(format!("state file {}", path.display())));
        }
    }

    if files.is_empty() {
        return Err(Error::NotFound(
            "no state files found in the given paths".to_string(),
        ));
    }
    Ok(files)
}

fn has_state_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| STATE_FILE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load a review log, choosing the reader by file extension
///
/// `.json` files are parsed as JSON logs; anything else is opened as a
/// SQLite reviewed-state database.
#[cfg(feature = "sqlx")]
pub async fn load_review_log(path: &Path) -> Result<ReviewLog> {
    if is_json(path) {
        ReviewLog::from_json_path(path)
    } else {
        ReviewLog::from_sqlite(path).await
    }
}

/// Load a JSON review log (SQLite support requires the `sqlx` feature)
#[cfg(not(feature = "sqlx"))]
pub async fn load_review_log(path: &Path) -> Result<ReviewLog> {
    if is_json(path) {
        ReviewLog::from_json_path(path)
    } else {
        Err(Error::Config(format!(
            "{} is not a JSON log and SQLite support is disabled",
            path.display()
        )))
    }
}
