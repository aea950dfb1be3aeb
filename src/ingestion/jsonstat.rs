//! JSON-stat2 decoding - flatten a dataset response into a StatTable

use crate::ingestion::types::{StatRow, StatTable};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON-stat2: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON-stat2 dataset, got class {0:?}")]
    NotDataset(String),

    #[error("dimension ids ({ids}) and sizes ({sizes}) differ in length")]
    ShapeMismatch { ids: usize, sizes: usize },

    #[error("dimension {0:?} is listed in id but not described")]
    MissingDimension(String),

    #[error("dimension {dimension:?} has {actual} categories, size says {expected}")]
    CategoryCount {
        dimension: String,
        expected: usize,
        actual: usize,
    },

    #[error("dimension {dimension:?} has an invalid category index: {reason}")]
    CategoryIndex { dimension: String, reason: String },

    #[error("dataset has {actual} values, dimensions imply {expected}")]
    ValueCount { expected: usize, actual: usize },

    #[error("sparse value key {0:?} is not a valid position")]
    ValuePosition(String),
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    class: Option<String>,
    id: Vec<String>,
    size: Vec<usize>,
    dimension: HashMap<String, Dimension>,
    value: Values,
}

#[derive(Debug, Deserialize)]
struct Dimension {
    #[serde(default)]
    label: Option<String>,
    category: Category,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default)]
    index: Option<CategoryIndex>,
    #[serde(default)]
    label: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryIndex {
    List(Vec<String>),
    Positions(HashMap<String, usize>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Values {
    Dense(Vec<Option<f64>>),
    Sparse(HashMap<String, Option<f64>>),
}

/// Parse a JSON-stat2 response body
pub fn parse_json_stat2(body: &str) -> Result<StatTable, ParseError> {
    let dataset: Dataset = serde_json::from_str(body)?;
    flatten(dataset)
}

/// Parse an already-decoded JSON value
pub fn from_value(value: serde_json::Value) -> Result<StatTable, ParseError> {
    let dataset: Dataset = serde_json::from_value(value)?;
    flatten(dataset)
}

fn flatten(mut dataset: Dataset) -> Result<StatTable, ParseError> {
    if let Some(class) = &dataset.class {
        if class != "dataset" {
            return Err(ParseError::NotDataset(class.clone()));
        }
    }

    if dataset.id.len() != dataset.size.len() {
        return Err(ParseError::ShapeMismatch {
            ids: dataset.id.len(),
            sizes: dataset.size.len(),
        });
    }

    let mut columns = Vec::with_capacity(dataset.id.len());
    let mut category_labels: Vec<Vec<String>> = Vec::with_capacity(dataset.id.len());

    for (id, &size) in dataset.id.iter().zip(&dataset.size) {
        let dimension = dataset
            .dimension
            .remove(id)
            .ok_or_else(|| ParseError::MissingDimension(id.clone()))?;

        let codes = ordered_codes(id, &dimension.category)?;
        if codes.len() != size {
            return Err(ParseError::CategoryCount {
                dimension: id.clone(),
                expected: size,
                actual: codes.len(),
            });
        }

        let labels = dimension.category.label.unwrap_or_default();
        category_labels.push(
            codes
                .into_iter()
                .map(|code| labels.get(&code).cloned().unwrap_or(code))
                .collect(),
        );
        columns.push(dimension.label.unwrap_or_else(|| id.clone()));
    }

    let total: usize = dataset.size.iter().product();
    let values = dense_values(dataset.value, total)?;

    let rows = values
        .into_iter()
        .enumerate()
        .map(|(flat, value)| StatRow {
            categories: coordinates(flat, &dataset.size)
                .into_iter()
                .zip(&category_labels)
                .map(|(pos, labels)| labels[pos].clone())
                .collect(),
            value,
        })
        .collect();

    Ok(StatTable { columns, rows })
}

/// Category codes in index order
fn ordered_codes(dimension: &str, category: &Category) -> Result<Vec<String>, ParseError> {
    match &category.index {
        Some(CategoryIndex::List(codes)) => Ok(codes.clone()),
        Some(CategoryIndex::Positions(positions)) => {
            let mut codes: Vec<Option<String>> = vec![None; positions.len()];
            for (code, &pos) in positions {
                let slot = codes.get_mut(pos).ok_or_else(|| ParseError::CategoryIndex {
                    dimension: dimension.to_string(),
                    reason: format!("position {} out of range for {:?}", pos, code),
                })?;
                if slot.is_some() {
                    return Err(ParseError::CategoryIndex {
                        dimension: dimension.to_string(),
                        reason: format!("position {} used twice", pos),
                    });
                }
                *slot = Some(code.clone());
            }
            // Positions are unique and in range, so every slot is filled
            Ok(codes.into_iter().flatten().collect())
        }
        // A single-category dimension may omit the index
        None => match &category.label {
            Some(labels) if labels.len() == 1 => Ok(labels.keys().cloned().collect()),
            _ => Err(ParseError::CategoryIndex {
                dimension: dimension.to_string(),
                reason: "index is missing and label does not name exactly one category"
                    .to_string(),
            }),
        },
    }
}

fn dense_values(values: Values, total: usize) -> Result<Vec<Option<f64>>, ParseError> {
    match values {
        Values::Dense(values) => {
            if values.len() != total {
                return Err(ParseError::ValueCount {
                    expected: total,
                    actual: values.len(),
                });
            }
            Ok(values)
        }
        Values::Sparse(entries) => {
            let mut dense = vec![None; total];
            for (key, value) in entries {
                let pos: usize = key
                    .parse()
                    .map_err(|_| ParseError::ValuePosition(key.clone()))?;
                let slot = dense
                    .get_mut(pos)
                    .ok_or_else(|| ParseError::ValuePosition(key.clone()))?;
                *slot = value;
            }
            Ok(dense)
        }
    }
}

/// Row-major coordinates of a flat value position (last dimension fastest)
fn coordinates(mut flat: usize, sizes: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; sizes.len()];
    for (coord, &size) in coords.iter_mut().zip(sizes).rev() {
        *coord = flat % size;
        flat /= size;
    }
    coords
}
