//! SQLite reviewed-state reader
//!
//! Opens the state database read-only and reads the labeled rows of the
//! `results` table in insertion order. The dataset size comes from
//! `record_table`.

use super::{ReviewLog, ReviewedRecord};
use crate::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

type ResultRow = (
    i64,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Connect to a state database without write access
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "state database {}",
            db_path.display()
        )));
    }

    // immutable=1: SQLite skips locking and never writes, even for journals
    let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;
    Ok(pool)
}

impl ReviewLog {
    /// Read a review log from a SQLite reviewed-state database
    ///
    /// # Errors
    /// - `NotFound` when the file does not exist
    /// - `Database` when the tables are missing or unreadable
    /// - `InvalidInput` when a stored label is not 0 or 1
    pub async fn from_sqlite(db_path: &Path) -> Result<Self> {
        let pool = connect_readonly(db_path).await?;

        let rows = sqlx::query_as::<_, ResultRow>(
            "SELECT record_id, label, query_strategy, classifier, feature_extraction, balance_strategy \
             FROM results ORDER BY rowid",
        )
        .fetch_all(&pool)
        .await?;

        let n_records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record_table")
            .fetch_one(&pool)
            .await?;

        pool.close().await;

        let total_rows = rows.len();
        let mut records = Vec::with_capacity(total_rows);
        for (record_id, label, query_strategy, classifier, feature_extraction, balance_strategy) in
            rows
        {
            // NULL label: record queued for screening but not labeled yet
            let Some(label) = label else { continue };
            let label = match label {
                0 => 0u8,
                1 => 1u8,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "record {} has label {}, expected 0 or 1",
                        record_id, other
                    )))
                }
            };
            records.push(ReviewedRecord {
                record_id,
                label,
                query_strategy,
                classifier,
                feature_extraction,
                balance_strategy,
            });
        }

        debug!(
            "{} of {} result rows labeled in {}",
            records.len(),
            total_rows,
            db_path.display()
        );
        info!(
            "Loaded SQLite state {} ({} labeled of {} records)",
            db_path.display(),
            records.len(),
            n_records
        );

        Self::new(n_records.max(0) as usize, records)
    }
}
