//! Query builders - endpoint URLs and request bodies for the statistics API
//!
//! Paavo (postal code area open data) publishes each nominal year in the
//! vintage two editions later, so the URL for year `y` names `y + 2`. The
//! table identifier and the dwellings selection key changed in the 2018
//! data, which is why the builder branches on the year.

use crate::ingestion::types::{DimensionFilter, FilterValue, StatQuery};

pub const DEFAULT_PAAVO_BASE_URL: &str =
    "https://pxnet2.stat.fi:443/PXWeb/api/v1/en/Postinumeroalueittainen_avoin_tieto";

pub const DEFAULT_SALES_URL: &str =
    "https://pxnet2.stat.fi:443/PXWeb/api/v1/en/StatFin/asu/ashi/vv/statfin_ashi_pxt_112q.px";

/// Offset between a nominal year and the Paavo vintage publishing it
pub const PAAVO_VINTAGE_OFFSET: i32 = 2;

/// First nominal year served by the renamed Paavo table
pub const PAAVO_SCHEMA_CHANGE_YEAR: i32 = 2018;

/// Building type "6": blocks of flats
const SALES_BUILDING_TYPE: &str = "6";
/// Year of construction "0": all construction years
const SALES_CONSTRUCTION_YEAR: &str = "0";
/// Published number of sales
const SALES_MEASURE: &str = "lkm_julk";

/// Base URLs of the two statistics endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub paavo_base_url: String,
    pub sales_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            paavo_base_url: DEFAULT_PAAVO_BASE_URL.to_string(),
            sales_url: DEFAULT_SALES_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Dwellings query for a single nominal year
    pub fn paavo_query(&self, year: i32) -> (String, StatQuery) {
        let vintage = year + PAAVO_VINTAGE_OFFSET;
        let base = self.paavo_base_url.trim_end_matches('/');

        let (url, selection_key) = if year < PAAVO_SCHEMA_CHANGE_YEAR {
            (
                format!("{base}/{vintage}/paavo_6_ra_{vintage}.px"),
                "Ra_asunn",
            )
        } else {
            (format!("{base}/{vintage}/paavo_pxt_12f4.px"), "ra_asunn")
        };

        let query = StatQuery::json_stat2(vec![DimensionFilter::items(
            "Tiedot",
            vec![FilterValue::Code(selection_key.to_string())],
        )]);

        (url, query)
    }

    /// Apartment sales query covering all `years` in one request
    pub fn sales_query(&self, years: &[i32]) -> (String, StatQuery) {
        let query = StatQuery::json_stat2(vec![
            DimensionFilter::items(
                "Talotyyppi",
                vec![FilterValue::Code(SALES_BUILDING_TYPE.to_string())],
            ),
            DimensionFilter::items(
                "Rakennusvuosi",
                vec![FilterValue::Code(SALES_CONSTRUCTION_YEAR.to_string())],
            ),
            DimensionFilter::items(
                "Vuosi",
                years.iter().copied().map(FilterValue::Year).collect(),
            ),
            DimensionFilter::items(
                "Tiedot",
                vec![FilterValue::Code(SALES_MEASURE.to_string())],
            ),
        ]);

        (self.sales_url.clone(), query)
    }
}

/// Dwellings query against the public endpoint
pub fn generate_paavo_query(year: i32) -> (String, StatQuery) {
    Endpoints::default().paavo_query(year)
}

/// Sales query against the public endpoint
pub fn generate_sales_query(years: &[i32]) -> (String, StatQuery) {
    Endpoints::default().sales_query(years)
}
