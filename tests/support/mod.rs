//! Shared fakes for behaviour tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hiram_core::http_client::HttpFuture;
use hiram_core::{
    ClientConfig, HttpClient, HttpError, HttpRequest, HttpResponse, MarketDataClient, Ticker,
};
use tokio::sync::Notify;

pub const BASE_URL: &str = "http://market.test/api";

/// HTTP fake answering from a URL → response table.
///
/// Unknown URLs answer 404. A gated URL holds its response until the gate
/// is opened, which lets tests interleave user actions with in-flight
/// requests.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, Result<HttpResponse, HttpError>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, response: Result<HttpResponse, HttpError>) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(url(path), response);
    }

    pub fn respond_json(&self, path: &str, body: &str) {
        self.respond(path, Ok(HttpResponse::ok_json(body)));
    }

    /// Hold responses for `path` until the returned gate is notified.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .expect("gates lock")
            .insert(url(path), Arc::clone(&gate));
        gate
    }

    pub fn calls_to(&self, path: &str) -> usize {
        let target = url(path);
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|called| **called == target)
            .count()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn get<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            self.calls
                .lock()
                .expect("calls lock")
                .push(request.url.clone());

            let gate = self.gates.lock().expect("gates lock").get(&request.url).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.routes
                .lock()
                .expect("routes lock")
                .get(&request.url)
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "not found")))
        })
    }
}

pub fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}

pub fn snapshot_path(ticker: &str) -> String {
    format!("/stocks/{ticker}/data")
}

pub fn client(http: &Arc<ScriptedHttpClient>) -> Arc<MarketDataClient> {
    Arc::new(MarketDataClient::new(
        ClientConfig::default().with_base_url(BASE_URL),
        Arc::clone(http) as Arc<dyn HttpClient>,
    ))
}

pub fn ticker(value: &str) -> Ticker {
    Ticker::parse(value).expect("valid ticker")
}

pub const CATALOG_JSON: &str = r#"[
    {"symbol": "AAPL", "security_name": "Apple Inc."},
    {"symbol": "MSFT", "security_name": "Microsoft Corp."}
]"#;

/// Snapshot body with one January point and high-risk, overbought metrics.
pub const AAPL_SNAPSHOT_JSON: &str = r#"{
    "price": 150,
    "hist": [{"Date": "2024-01-02", "Close": 148, "Volume": 1000, "cumulative_return": 0}],
    "beta": 1.6,
    "historical_volatility": 45,
    "rsi": 75,
    "options_data": null
}"#;

pub const MSFT_SNAPSHOT_JSON: &str = r#"{
    "price": 402.5,
    "hist": [
        {"Date": "2024-01-02T00:00:00", "Close": 370.87, "Volume": 25258600, "cumulative_return": 0},
        {"Date": "2024-01-03T00:00:00", "Close": 370.6, "Volume": 23083500, "cumulative_return": -0.0007}
    ],
    "market_cap": 2.99e12,
    "pe_ratio": 36.2,
    "beta": 0.9,
    "dividend_yield": 0.75,
    "fifty_two_week_high": 420.82,
    "fifty_two_week_low": 245.61,
    "ma_50": 380.1,
    "ma_200": 340.4,
    "rsi": 55,
    "historical_volatility": 18,
    "options_data": {
        "expiry_dates": ["2024-01-05", "2024-01-12"],
        "put_call_ratio": 0.62,
        "nearest_expiry": "2024-01-05"
    }
}"#;
