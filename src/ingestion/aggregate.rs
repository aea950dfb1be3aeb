//! Aggregation - fetch and clean both datasets for a set of years

use crate::ingestion::clean::{clean_dwellings, clean_sales};
use crate::ingestion::fetch::StatClient;
use crate::ingestion::query::Endpoints;
use crate::ingestion::types::{DwellingCount, DwellingRecord, SalesRecord};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Fetch sales for all `years` with a single query
pub async fn fetch_sales_by_years(
    client: &StatClient,
    endpoints: &Endpoints,
    years: &[i32],
) -> Result<Vec<SalesRecord>> {
    info!("Fetching apartment sales for years {:?}", years);

    let (url, query) = endpoints.sales_query(years);
    let table = client
        .fetch(&url, &query)
        .await
        .context("failed to fetch apartment sales")?;
    let records = clean_sales(&table).context("failed to clean apartment sales")?;

    info!("Cleaned {} sales rows", records.len());
    Ok(records)
}

/// Fetch dwellings for one year; the endpoint has no multi-year queries
pub async fn fetch_dwellings_by_year(
    client: &StatClient,
    endpoints: &Endpoints,
    year: i32,
) -> Result<Vec<DwellingRecord>> {
    info!("Fetching dwellings for {}", year);

    let (url, query) = endpoints.paavo_query(year);
    let table = client
        .fetch(&url, &query)
        .await
        .with_context(|| format!("failed to fetch dwellings for {}", year))?;
    let counts =
        clean_dwellings(&table).with_context(|| format!("failed to clean dwellings for {}", year))?;

    let records = stamp_year(counts, year);
    info!("Cleaned {} dwelling rows for {}", records.len(), year);
    Ok(records)
}

/// Stamp `year` onto each count, keeping areas with at least one dwelling
/// Pure function - no side effects
pub fn stamp_year(counts: Vec<DwellingCount>, year: i32) -> Vec<DwellingRecord> {
    let total = counts.len();

    let records: Vec<DwellingRecord> = counts
        .into_iter()
        .filter(|c| c.dwellings > 0.0)
        .map(|c| DwellingRecord {
            year,
            postal_code: c.postal_code,
            dwellings: c.dwellings,
        })
        .collect();

    debug!(
        "Dropped {} areas without dwellings for {}",
        total - records.len(),
        year
    );

    records
}

/// Fetch sales once and dwellings per year, in year order
pub async fn fetch_all(
    client: &StatClient,
    endpoints: &Endpoints,
    years: &[i32],
) -> Result<(Vec<SalesRecord>, Vec<DwellingRecord>)> {
    let sales = fetch_sales_by_years(client, endpoints, years).await?;

    let mut dwellings = Vec::new();
    for &year in years {
        dwellings.extend(fetch_dwellings_by_year(client, endpoints, year).await?);
    }

    Ok((sales, dwellings))
}
