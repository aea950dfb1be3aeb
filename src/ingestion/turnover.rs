//! Turnover - join sales with dwellings and derive sales per dwelling

use crate::ingestion::types::{DwellingRecord, SalesRecord, TurnoverRecord};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum TurnoverError {
    #[error("duplicate {table} row for postal code {postal_code} in {year}")]
    DuplicateKey {
        table: &'static str,
        postal_code: String,
        year: i32,
    },

    #[error("missing values in data after computing turnover (postal code {postal_code:?}, year {year})")]
    MissingValues { postal_code: String, year: i32 },
}

/// Fail on the first repeated (postal_code, year) pair
fn ensure_unique_keys<'a>(
    table: &'static str,
    keys: impl Iterator<Item = (&'a str, i32)>,
) -> Result<(), TurnoverError> {
    let mut seen = HashSet::new();
    for (postal_code, year) in keys {
        if !seen.insert((postal_code, year)) {
            return Err(TurnoverError::DuplicateKey {
                table,
                postal_code: postal_code.to_string(),
                year,
            });
        }
    }
    Ok(())
}

/// Inner join on (postal_code, year) in sales order, then turnover = sales / dwellings
pub fn compute_turnover(
    sales: &[SalesRecord],
    dwellings: &[DwellingRecord],
) -> Result<Vec<TurnoverRecord>, TurnoverError> {
    ensure_unique_keys("sales", sales.iter().map(|s| (s.postal_code.as_str(), s.year)))?;
    ensure_unique_keys(
        "dwellings",
        dwellings.iter().map(|d| (d.postal_code.as_str(), d.year)),
    )?;

    let by_key: HashMap<(&str, i32), f64> = dwellings
        .iter()
        .map(|d| ((d.postal_code.as_str(), d.year), d.dwellings))
        .collect();

    let joined: Vec<TurnoverRecord> = sales
        .iter()
        .filter_map(|s| {
            by_key
                .get(&(s.postal_code.as_str(), s.year))
                .map(|&dwellings| TurnoverRecord {
                    postal_code: s.postal_code.clone(),
                    year: s.year,
                    sales: s.sales,
                    dwellings,
                    turnover: s.sales / dwellings,
                })
        })
        .collect();

    debug!(
        "Joined {} of {} sales rows against {} dwelling rows",
        joined.len(),
        sales.len(),
        dwellings.len()
    );

    ensure_complete(&joined)?;

    info!("Computed turnover for {} postal code years", joined.len());
    Ok(joined)
}

/// Every joined row must be fully populated
pub fn ensure_complete(records: &[TurnoverRecord]) -> Result<(), TurnoverError> {
    match records.iter().find(|r| !is_complete(r)) {
        Some(r) => Err(TurnoverError::MissingValues {
            postal_code: r.postal_code.clone(),
            year: r.year,
        }),
        None => Ok(()),
    }
}

fn is_complete(record: &TurnoverRecord) -> bool {
    !record.postal_code.is_empty()
        && record.sales.is_finite()
        && record.dwellings.is_finite()
        && record.turnover.is_finite()
}
