//! Data ingestion module - functional pipeline from statistics API to SQLite

pub mod aggregate;
pub mod clean;
pub mod fetch;
pub mod jsonstat;
pub mod query;
pub mod turnover;
pub mod types;
pub mod utils;
pub mod write;

pub use types::*;

use crate::config::Config;
use anyhow::{Context, Result};
use fetch::StatClient;
use std::path::Path;
use tracing::info;

/// Fetch, clean, join and persist one run into a new database at `db_path`
pub async fn run_pipeline(config: &Config, db_path: &Path) -> Result<RunSummary> {
    info!("=== Apartment Turnover Pipeline ===");

    // Checked up front so an existing file is never fetched against
    write::ensure_absent(db_path)?;

    let years = config.years.years();
    let client = StatClient::new();

    info!("Step 1/3: Fetching data for {:?}...", years);
    let (sales, dwellings) = aggregate::fetch_all(&client, &config.endpoints, &years).await?;
    info!(
        "✓ Fetched {} sales rows and {} dwelling rows",
        sales.len(),
        dwellings.len()
    );

    info!("Step 2/3: Computing turnover...");
    let records = turnover::compute_turnover(&sales, &dwellings)
        .context("failed to compute turnover")?;
    info!("✓ Joined {} rows", records.len());

    info!("Step 3/3: Writing to database...");
    let write_stats = write::write_turnover(db_path, &records)
        .await
        .with_context(|| format!("failed to write {}", db_path.display()))?;
    info!("✓ Write complete");

    Ok(RunSummary {
        sales_rows: sales.len(),
        dwelling_rows: dwellings.len(),
        turnover_rows: records.len(),
        write: write_stats,
    })
}
