//! Write functions - persist the turnover table to a new SQLite database
//!
//! The destination must not exist. Rows go into a hidden staging file next
//! to it, which is hard-linked into place once the transaction commits, so
//! a failed run never leaves a database at the destination.

use crate::ingestion::types::{TurnoverRecord, WriteStats};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const TABLE_NAME: &str = "apartment_sales";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("output database {0:?} already exists")]
    AlreadyExists(PathBuf),

    #[error("output path {0:?} has no file name")]
    InvalidPath(PathBuf),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Refuse to touch an existing destination
pub fn ensure_absent(db_path: &Path) -> Result<(), WriteError> {
    match fs::symlink_metadata(db_path) {
        Ok(_) => Err(WriteError::AlreadyExists(db_path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(WriteError::Io {
            path: db_path.to_path_buf(),
            source,
        }),
    }
}

/// Hidden sibling of `db_path` used while the table is being written
pub fn staging_path(db_path: &Path) -> Result<PathBuf, WriteError> {
    let name = db_path
        .file_name()
        .ok_or_else(|| WriteError::InvalidPath(db_path.to_path_buf()))?;

    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(".partial");

    Ok(db_path.with_file_name(staged))
}

/// Create `db_path` holding the turnover table
pub async fn write_turnover(
    db_path: &Path,
    records: &[TurnoverRecord],
) -> Result<WriteStats, WriteError> {
    info!("Writing {} turnover rows to {:?}", records.len(), db_path);

    ensure_absent(db_path)?;
    let staging = staging_path(db_path)?;
    remove_if_present(&staging)?;

    let result = match write_table(&staging, records).await {
        Ok(stats) => publish(&staging, db_path).map(|_| stats),
        Err(e) => Err(e),
    };

    if let Err(e) = remove_if_present(&staging) {
        warn!("Failed to remove staging file: {}", e);
    }

    let stats = result?;
    info!("Write complete: {}", stats);
    Ok(stats)
}

async fn write_table(path: &Path, records: &[TurnoverRecord]) -> Result<WriteStats, WriteError> {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await?;

    let mut tx = conn.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE apartment_sales (
            "index" INTEGER,
            postal_code TEXT,
            year INTEGER,
            sales REAL,
            dwellings REAL,
            turnover REAL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(r#"CREATE INDEX ix_apartment_sales_index ON apartment_sales ("index")"#)
        .execute(&mut *tx)
        .await?;

    for (idx, record) in records.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO apartment_sales ("index", postal_code, year, sales, dwellings, turnover)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(idx as i64)
        .bind(&record.postal_code)
        .bind(record.year)
        .bind(record.sales)
        .bind(record.dwellings)
        .bind(record.turnover)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    conn.close().await?;

    debug!("Staged {} rows in {:?}", records.len(), path);

    Ok(WriteStats {
        table: TABLE_NAME.to_string(),
        inserted: records.len(),
    })
}

/// Link the staged file into place; linking never replaces an existing path
fn publish(staging: &Path, db_path: &Path) -> Result<(), WriteError> {
    fs::hard_link(staging, db_path).map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            WriteError::AlreadyExists(db_path.to_path_buf())
        } else {
            WriteError::Io {
                path: db_path.to_path_buf(),
                source,
            }
        }
    })
}

fn remove_if_present(path: &Path) -> Result<(), WriteError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
