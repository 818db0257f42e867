//! # Hiram Core
//!
//! Client-side market-data orchestration and derived analytics for the
//! Hiram stock-analysis view.
//!
//! ## Overview
//!
//! - **Symbol catalog** fetched once per session and shared by the picker
//! - **Snapshot fetch** gated behind an explicit "run analysis" action
//! - **Series normalization** from server payloads into a uniform series
//! - **Horizon windowing** (5y, 1y, 6m, 1m) of the displayed series
//! - **Classification** of risk tier, trend and momentum from snapshot metrics
//! - **Watchlist** persisted through a pluggable key-value backend
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analytics`] | Cumulative returns, rolling volatility, series RSI |
//! | [`api`] | Typed client for `GET /symbols` and `GET /stocks/{symbol}/data` |
//! | [`cache`] | Session cache with request de-duplication |
//! | [`catalog`] | Symbol catalog and picker state |
//! | [`config`] | Client and watchlist configuration |
//! | [`domain`] | Domain models |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`indicators`] | Label classifiers |
//! | [`orchestrator`] | Analysis state machine |
//! | [`payload`] | Server wire records |
//! | [`transform`] | Payload to domain conversion |
//! | [`watchlist`] | Persisted watchlist store |
//! | [`window`] | Time-window filters |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hiram_core::{AnalysisOrchestrator, ClientConfig, MarketDataClient, SymbolCatalog, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hiram_core::CoreError> {
//!     let client = Arc::new(MarketDataClient::from_config(ClientConfig::from_env()));
//!     let catalog = SymbolCatalog::new(client.clone());
//!     let symbols = catalog.fetch_all().await?;
//!
//!     let mut analysis = AnalysisOrchestrator::new();
//!     analysis.select_symbol(symbols[0].ticker.clone());
//!     analysis.analyze(&*client).await?;
//!
//!     if let Some(view) = analysis.view() {
//!         println!("{} risk: {}", view.ticker(), view.signals().risk);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! The orchestrator is driven from a single task. A fetch may still be in
//! flight when the user picks another symbol; its result is then discarded
//! by [`AnalysisOrchestrator::complete`] instead of being displayed.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod indicators;
pub mod orchestrator;
pub mod payload;
pub mod transform;
pub mod watchlist;
pub mod window;

// Analytics
pub use analytics::{cumulative_returns, rolling_volatility, series_rsi, VolatilityPoint};

// Remote data access
pub use api::{MarketDataClient, SnapshotSource, SymbolSource};

// Caching
pub use cache::CacheStore;

// Catalog
pub use catalog::{filter_symbols, matches_query, PickerOption, PickerState, SymbolCatalog, SymbolPicker};

// Configuration
pub use config::{ClientConfig, WatchlistConfig};

// Domain models
pub use domain::{
    OptionsSummary, SeriesPoint, StockMetrics, StockSnapshot, SymbolEntry, Ticker, TimeHorizon,
};

// Error types
pub use error::{CoreError, DecodeError, FetchError, StorageError, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Classification
pub use indicators::{
    classify, momentum_status, risk_tier, trend_signal, MomentumStatus, RiskTier, Signals,
    TrendSignal,
};

// State machine
pub use orchestrator::{
    AnalysisOrchestrator, AnalysisState, AnalysisView, FetchOutcome, FetchTicket, SelectionState,
};

// Transformation
pub use transform::normalize;

// Watchlist
pub use watchlist::{JsonFileBackend, MemoryBackend, Watchlist, WatchlistBackend, WatchlistStore};

// Windowing
pub use window::{between, cutoff, window};
