//! Fetch functions - post queries to the statistics API and decode the tables

use crate::ingestion::jsonstat::{parse_json_stat2, ParseError};
use crate::ingestion::types::{StatQuery, StatTable};
use crate::ingestion::utils::http_post_json;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} failed: {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },
}

/// Thin client for the PxWeb statistics API
#[derive(Debug, Clone, Default)]
pub struct StatClient {
    http: Client,
}

impl StatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        StatClient { http }
    }

    /// Post `query` to `url` and decode the JSON-stat2 response
    pub async fn fetch(&self, url: &str, query: &StatQuery) -> Result<StatTable, FetchError> {
        let body = http_post_json(&self.http, url, query).await?;

        let table = parse_json_stat2(&body).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })?;

        info!(
            "Decoded {} observations across columns {:?}",
            table.len(),
            table.columns
        );

        Ok(table)
    }
}
