//! Core data types for the ingestion pipeline
//! Pure data structures with no behavior beyond lookups

use serde::Serialize;

/// Request body accepted by the PxWeb statistics API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatQuery {
    pub query: Vec<DimensionFilter>,
    pub response: ResponseFormat,
}

/// Selection applied to one dimension of a statistics table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionFilter {
    pub code: String,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub filter: String,
    pub values: Vec<FilterValue>,
}

/// Filter values go on the wire either as category codes or as bare years
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Code(String),
    Year(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    pub format: String,
}

impl DimensionFilter {
    /// An `"item"` filter selecting the given values
    pub fn items(code: &str, values: Vec<FilterValue>) -> Self {
        DimensionFilter {
            code: code.to_string(),
            selection: Selection {
                filter: "item".to_string(),
                values,
            },
        }
    }
}

impl StatQuery {
    /// Query asking for a JSON-stat2 response
    pub fn json_stat2(query: Vec<DimensionFilter>) -> Self {
        StatQuery {
            query,
            response: ResponseFormat {
                format: "json-stat2".to_string(),
            },
        }
    }
}

/// Decoded statistics table: one column per dimension plus the observation value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatTable {
    /// Dimension labels, in the order the response lists them
    pub columns: Vec<String>,
    pub rows: Vec<StatRow>,
}

/// One observation. `categories` is parallel to `StatTable::columns`
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub categories: Vec<String>,
    pub value: Option<f64>,
}

impl StatTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apartment sales count for one postal code area and year
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub year: i32,
    pub postal_code: String,
    pub sales: f64,
}

/// Dwelling count from a single Paavo vintage, before the year is stamped on
#[derive(Debug, Clone, PartialEq)]
pub struct DwellingCount {
    pub postal_code: String,
    pub dwellings: f64,
}

/// Dwelling count for one postal code area and year
#[derive(Debug, Clone, PartialEq)]
pub struct DwellingRecord {
    pub year: i32,
    pub postal_code: String,
    pub dwellings: f64,
}

/// Joined row persisted to the output database
#[derive(Debug, Clone, PartialEq)]
pub struct TurnoverRecord {
    pub postal_code: String,
    pub year: i32,
    pub sales: f64,
    pub dwellings: f64,
    pub turnover: f64,
}

/// Write operation statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WriteStats {
    pub table: String,
    pub inserted: usize,
}

impl std::fmt::Display for WriteStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table: {}, inserted: {}", self.table, self.inserted)
    }
}

/// Outcome of one full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub sales_rows: usize,
    pub dwelling_rows: usize,
    pub turnover_rows: usize,
    pub write: WriteStats,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "sales rows: {}, dwelling rows: {}, joined rows: {}, {}",
            self.sales_rows, self.dwelling_rows, self.turnover_rows, self.write
        )
    }
}
