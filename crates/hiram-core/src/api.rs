//! Typed access to the market-data HTTP service.
//!
//! | Call | Path | Result |
//! |------|------|--------|
//! | [`MarketDataClient::symbols`] | `GET /symbols` | `Vec<SymbolEntry>` |
//! | [`MarketDataClient::stock_snapshot`] | `GET /stocks/{symbol}/data` | [`StockSnapshot`] |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::payload::{RawStockPayload, RawSymbol};
use crate::transform::{snapshot_from_payload, symbols_from_payload};
use crate::{ClientConfig, DecodeError, FetchError, StockSnapshot, SymbolEntry, Ticker};

pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Source of the tradable-symbol list.
pub trait SymbolSource: Send + Sync {
    fn fetch_symbols(&self) -> FetchFuture<'_, Vec<SymbolEntry>>;
}

/// Source of per-symbol snapshots.
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot<'a>(&'a self, ticker: &'a Ticker) -> FetchFuture<'a, StockSnapshot>;
}

#[derive(Clone)]
pub struct MarketDataClient {
    config: ClientConfig,
    http_client: Arc<dyn HttpClient>,
}

impl MarketDataClient {
    pub fn new(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Client using reqwest with `config`.
    pub fn from_config(config: ClientConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config));
        Self::new(config, http_client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn symbols(&self) -> Result<Vec<SymbolEntry>, FetchError> {
        let raw: Vec<RawSymbol> = self.get_json("/symbols").await?;
        let symbols = symbols_from_payload(raw);
        log::info!("loaded {} symbols from catalog", symbols.len());
        Ok(symbols)
    }

    pub async fn stock_snapshot(&self, ticker: &Ticker) -> Result<StockSnapshot, FetchError> {
        let path = format!("/stocks/{}/data", urlencoding::encode(ticker.as_str()));
        let raw: RawStockPayload = self.get_json(&path).await?;
        Ok(snapshot_from_payload(ticker.clone(), raw)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.config.url(path);
        log::debug!("GET {url}");

        let request = HttpRequest::get(url.as_str()).with_timeout_ms(self.config.timeout_ms);
        let response = self.http_client.get(request).await.map_err(|error| {
            log::warn!("GET {url} failed: {error}");
            FetchError::network(error.message())
        })?;

        if !response.is_success() {
            log::warn!("GET {url} returned status {}", response.status);
            return Err(FetchError::network(format!(
                "unexpected HTTP status {}",
                response.status
            )));
        }

        serde_json::from_str(&response.body).map_err(|error| {
            log::warn!("GET {url} returned an unexpected payload: {error}");
            FetchError::Decode(DecodeError::from(error))
        })
    }
}

impl SymbolSource for MarketDataClient {
    fn fetch_symbols(&self) -> FetchFuture<'_, Vec<SymbolEntry>> {
        Box::pin(self.symbols())
    }
}

impl SnapshotSource for MarketDataClient {
    fn fetch_snapshot<'a>(&'a self, ticker: &'a Ticker) -> FetchFuture<'a, StockSnapshot> {
        Box::pin(self.stock_snapshot(ticker))
    }
}

impl<T: SymbolSource + ?Sized> SymbolSource for Arc<T> {
    fn fetch_symbols(&self) -> FetchFuture<'_, Vec<SymbolEntry>> {
        (**self).fetch_symbols()
    }
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    fn fetch_snapshot<'a>(&'a self, ticker: &'a Ticker) -> FetchFuture<'a, StockSnapshot> {
        (**self).fetch_snapshot(ticker)
    }
}
