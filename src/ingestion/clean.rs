//! Cleaners - turn decoded statistics tables into typed records
//!
//! Both cleaners keep only the documented columns, normalize postal codes,
//! drop aggregate/malformed areas and drop rows with a missing value.

use crate::ingestion::types::{DwellingCount, SalesRecord, StatTable};
use crate::ingestion::utils::normalize_postal_code;
use thiserror::Error;
use tracing::{debug, warn};

pub const DWELLINGS_POSTAL_CODE: &str = "Postal code area";
/// Older Paavo vintages label the information dimension "Data"
pub const DWELLINGS_INFORMATION: [&str; 2] = ["Data", "Information"];

pub const SALES_YEAR: &str = "Year";
pub const SALES_POSTAL_CODE: &str = "Postal code";
/// Dimensions pinned by the sales query filters
pub const SALES_FIXED: [&str; 3] = ["Building type", "Year of construction", "Information"];

#[derive(Debug, Error, PartialEq)]
pub enum CleanError {
    #[error("{dataset} table has no {column:?} column (columns: {available:?})")]
    MissingColumn {
        dataset: &'static str,
        column: String,
        available: Vec<String>,
    },

    #[error("sales table has a non-integer year {0:?}")]
    InvalidYear(String),
}

fn require_column(
    table: &StatTable,
    dataset: &'static str,
    column: &str,
) -> Result<usize, CleanError> {
    table
        .column_index(column)
        .ok_or_else(|| CleanError::MissingColumn {
            dataset,
            column: column.to_string(),
            available: table.columns.clone(),
        })
}

fn warn_unused_columns(table: &StatTable, dataset: &str, known: &[usize]) {
    for (idx, column) in table.columns.iter().enumerate() {
        if !known.contains(&idx) {
            warn!("Ignoring unexpected {} column {:?}", dataset, column);
        }
    }
}

/// Clean one Paavo dwellings table
pub fn clean_dwellings(table: &StatTable) -> Result<Vec<DwellingCount>, CleanError> {
    let postal_idx = require_column(table, "dwellings", DWELLINGS_POSTAL_CODE)?;
    let info_idx = DWELLINGS_INFORMATION
        .iter()
        .find_map(|column| table.column_index(column))
        .ok_or_else(|| CleanError::MissingColumn {
            dataset: "dwellings",
            column: DWELLINGS_INFORMATION[1].to_string(),
            available: table.columns.clone(),
        })?;
    warn_unused_columns(table, "dwellings", &[postal_idx, info_idx]);

    let mut dropped_areas = 0;
    let mut dropped_missing = 0;
    let mut counts = Vec::with_capacity(table.len());

    for row in &table.rows {
        let Some(postal_code) = normalize_postal_code(&row.categories[postal_idx]) else {
            dropped_areas += 1;
            continue;
        };
        let Some(dwellings) = row.value else {
            dropped_missing += 1;
            continue;
        };

        counts.push(DwellingCount {
            postal_code,
            dwellings,
        });
    }

    debug!(
        "Cleaned dwellings: kept {}, dropped {} non-postal areas, {} missing values",
        counts.len(),
        dropped_areas,
        dropped_missing
    );

    Ok(counts)
}

/// Clean the multi-year apartment sales table
pub fn clean_sales(table: &StatTable) -> Result<Vec<SalesRecord>, CleanError> {
    let year_idx = require_column(table, "sales", SALES_YEAR)?;
    let postal_idx = require_column(table, "sales", SALES_POSTAL_CODE)?;

    let mut known = vec![year_idx, postal_idx];
    for column in SALES_FIXED {
        known.push(require_column(table, "sales", column)?);
    }
    warn_unused_columns(table, "sales", &known);

    let mut dropped_areas = 0;
    let mut dropped_missing = 0;
    let mut records = Vec::with_capacity(table.len());

    for row in &table.rows {
        let Some(postal_code) = normalize_postal_code(&row.categories[postal_idx]) else {
            dropped_areas += 1;
            continue;
        };

        let year_label = &row.categories[year_idx];
        let year = year_label
            .trim()
            .parse::<i32>()
            .map_err(|_| CleanError::InvalidYear(year_label.clone()))?;

        let Some(sales) = row.value else {
            dropped_missing += 1;
            continue;
        };

        records.push(SalesRecord {
            year,
            postal_code,
            sales,
        });
    }

    debug!(
        "Cleaned sales: kept {}, dropped {} non-postal areas, {} missing values",
        records.len(),
        dropped_areas,
        dropped_missing
    );

    Ok(records)
}
