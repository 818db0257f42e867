//! Wire records for the market-data HTTP contract.
//!
//! These mirror the server JSON exactly and are only consumed by
//! [`crate::transform`], which validates them into domain types.

use serde::{Deserialize, Serialize};

/// Element of `GET /symbols`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSymbol {
    pub symbol: String,
    pub security_name: String,
}

/// Timestamp as emitted by the server: a date/datetime string or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    EpochMillis(i64),
}

/// Element of the `hist` array of `GET /stocks/{symbol}/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesPoint {
    #[serde(rename = "Date", alias = "date")]
    pub date: RawDate,
    #[serde(rename = "Close", alias = "close")]
    pub close: f64,
    #[serde(rename = "Volume", alias = "volume", default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub cumulative_return: Option<f64>,
}

/// `options_data` block of the stock payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOptionsData {
    pub expiry_dates: Vec<String>,
    pub put_call_ratio: f64,
    pub nearest_expiry: String,
}

/// Body of `GET /stocks/{symbol}/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStockPayload {
    pub price: f64,
    #[serde(default)]
    pub hist: Option<Vec<RawSeriesPoint>>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub ma_50: Option<f64>,
    pub ma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub historical_volatility: Option<f64>,
    #[serde(default)]
    pub options_data: Option<RawOptionsData>,
}
