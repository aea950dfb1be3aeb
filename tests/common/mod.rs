//! Stub statistics API serving JSON-stat2 fixtures
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use housing_turnover::config::{Config, YearRange};
use housing_turnover::ingestion::query::Endpoints;
use serde_json::{json, Value};
use sqlx::{Connection, SqliteConnection};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const SALES_PATH: &str = "/sales";

#[derive(Default)]
pub struct Stub {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<(String, Value)>>,
}

pub struct StubServer {
    pub addr: SocketAddr,
    stub: Arc<Stub>,
}

async fn serve(State(stub): State<Arc<Stub>>, uri: Uri, Json(body): Json<Value>) -> Response {
    let path = uri.path().to_string();
    stub.requests.lock().unwrap().push((path.clone(), body));

    match stub.responses.get(&path) {
        Some(response) => Json(response.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

impl StubServer {
    pub async fn start(responses: HashMap<String, Value>) -> Self {
        // The stub is local; keep any configured HTTP proxy out of the way
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

        let stub = Arc::new(Stub {
            responses,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(serve).with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer { addr, stub }
    }

    pub fn paavo_base_url(&self) -> String {
        format!("http://{}/paavo", self.addr)
    }

    pub fn sales_url(&self) -> String {
        format!("http://{}{}", self.addr, SALES_PATH)
    }

    pub fn config(&self, first: i32, last: i32) -> Config {
        Config {
            years: YearRange::new(first, last).unwrap(),
            endpoints: Endpoints {
                paavo_base_url: self.paavo_base_url(),
                sales_url: self.sales_url(),
            },
        }
    }

    /// Requests received so far as (path, body)
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.stub.requests.lock().unwrap().clone()
    }
}

/// Dwellings table for one Paavo vintage: whole country, 00100, 00120, 00130
pub fn dwellings_fixture(info_label: &str, selection_key: &str, values: [Option<f64>; 4]) -> Value {
    json!({
        "version": "2.0",
        "class": "dataset",
        "label": "Paavo - Open data by postal code area",
        "id": ["Postinumeroalue", "Tiedot"],
        "size": [4, 1],
        "dimension": {
            "Postinumeroalue": {
                "label": "Postal code area",
                "category": {
                    "index": {"SSS": 0, "00100": 1, "00120": 2, "00130": 3},
                    "label": {
                        "SSS": "Finland",
                        "00100": "00100 Helsinki keskusta - Etu-Töölö (Helsinki)",
                        "00120": "00120 Punavuori (Helsinki)",
                        "00130": "00130 Kaartinkaupunki (Helsinki)"
                    }
                }
            },
            "Tiedot": {
                "label": info_label,
                "category": {
                    "index": {selection_key: 0},
                    "label": {selection_key: "Dwellings (RA)"}
                }
            }
        },
        "value": values
    })
}

/// Sales table for two years over whole country, 00100, 00120, 00140
pub fn sales_fixture(years: [i32; 2], values: [Option<f64>; 8]) -> Value {
    let (first, second) = (years[0].to_string(), years[1].to_string());
    json!({
        "version": "2.0",
        "class": "dataset",
        "label": "Number of sales of old dwellings in housing companies",
        "id": ["Vuosi", "Postinumero", "Talotyyppi", "Rakennusvuosi", "Tiedot"],
        "size": [2, 4, 1, 1, 1],
        "dimension": {
            "Vuosi": {
                "label": "Year",
                "category": {
                    "index": [first.clone(), second.clone()],
                    "label": {first.clone(): first, second.clone(): second}
                }
            },
            "Postinumero": {
                "label": "Postal code",
                "category": {
                    "index": ["SSS", "00100", "00120", "00140"],
                    "label": {
                        "SSS": "Whole country",
                        "00100": "00100 Helsinki keskusta",
                        "00120": "00120 Punavuori",
                        "00140": "00140 Kaivopuisto"
                    }
                }
            },
            "Talotyyppi": {
                "label": "Building type",
                "category": {"index": {"6": 0}, "label": {"6": "Blocks of flats total"}}
            },
            "Rakennusvuosi": {
                "label": "Year of construction",
                "category": {"index": {"0": 0}, "label": {"0": "Total"}}
            },
            "Tiedot": {
                "label": "Information",
                "category": {"index": {"lkm_julk": 0}, "label": {"lkm_julk": "Number of sales"}}
            }
        },
        "value": values
    })
}

/// Two years, three postal codes. 00140 has sales but no dwellings,
/// 00130 has dwellings but no sales, and 00120 has no 2014 sales figure.
pub fn fixture_responses() -> HashMap<String, Value> {
    HashMap::from([
        (
            SALES_PATH.to_string(),
            sales_fixture(
                [2013, 2014],
                [
                    Some(50_000.0),
                    Some(10.0),
                    Some(5.0),
                    Some(7.0),
                    Some(48_000.0),
                    Some(8.0),
                    None,
                    Some(3.0),
                ],
            ),
        ),
        (
            "/paavo/2015/paavo_6_ra_2015.px".to_string(),
            dwellings_fixture(
                "Data",
                "Ra_asunn",
                [Some(2_900_000.0), Some(5.0), Some(10.0), Some(0.0)],
            ),
        ),
        (
            "/paavo/2016/paavo_6_ra_2016.px".to_string(),
            dwellings_fixture(
                "Information",
                "Ra_asunn",
                [Some(2_950_000.0), Some(4.0), Some(8.0), Some(2.0)],
            ),
        ),
    ])
}

/// Rows of the fixture run: (postal_code, year, sales, dwellings, turnover)
pub fn expected_rows() -> Vec<(String, i64, f64, f64, f64)> {
    vec![
        ("00100".to_string(), 2013, 10.0, 5.0, 2.0),
        ("00120".to_string(), 2013, 5.0, 10.0, 0.5),
        ("00100".to_string(), 2014, 8.0, 4.0, 2.0),
    ]
}

pub async fn read_turnover(path: &Path) -> Vec<(String, i64, f64, f64, f64)> {
    let mut conn = SqliteConnection::connect(&format!("sqlite://{}", path.display()))
        .await
        .unwrap();
    let rows = sqlx::query_as(
        r#"SELECT postal_code, year, sales, dwellings, turnover
           FROM apartment_sales ORDER BY "index""#,
    )
    .fetch_all(&mut conn)
    .await
    .unwrap();
    conn.close().await.unwrap();
    rows
}
