//! Configuration loaded from environment variables

use crate::ingestion::query::{Endpoints, DEFAULT_PAAVO_BASE_URL, DEFAULT_SALES_URL};
use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_FIRST_YEAR: i32 = 2013;
pub const DEFAULT_LAST_YEAR: i32 = 2019;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid year range {0:?}, expected e.g. \"2013-2019\" or \"2015\"")]
    InvalidYears(String),

    #[error("year range {first}-{last} is empty")]
    EmptyYears { first: i32, last: i32 },
}

/// Inclusive range of nominal years to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    first: i32,
    last: i32,
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Result<Self, ConfigError> {
        if first > last {
            return Err(ConfigError::EmptyYears { first, last });
        }
        Ok(YearRange { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    /// Years in ascending order
    pub fn years(&self) -> Vec<i32> {
        (self.first..=self.last).collect()
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

impl FromStr for YearRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidYears(s.to_string()))
        };

        match s.split_once('-') {
            Some((first, last)) => YearRange::new(parse(first)?, parse(last)?),
            None => {
                let year = parse(s)?;
                YearRange::new(year, year)
            }
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub years: YearRange,
    pub endpoints: Endpoints,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let years = match env::var("TURNOVER_YEARS") {
            Ok(value) => value.parse()?,
            Err(_) => YearRange::default(),
        };

        Ok(Config {
            years,
            endpoints: Endpoints {
                paavo_base_url: env::var("PAAVO_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_PAAVO_BASE_URL.to_string()),
                sales_url: env::var("SALES_URL").unwrap_or_else(|_| DEFAULT_SALES_URL.to_string()),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            years: YearRange::default(),
            endpoints: Endpoints::default(),
        }
    }
}
