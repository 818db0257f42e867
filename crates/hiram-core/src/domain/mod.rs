//! # Domain Models
//!
//! Canonical types for the stock-analysis view.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase exchange ticker |
//! | [`SymbolEntry`] | Catalog entry (ticker + display name) |
//! | [`SeriesPoint`] | One normalized day of price history |
//! | [`StockMetrics`] | Server-computed metrics over the full history |
//! | [`OptionsSummary`] | Put/call ratio and listed expiries |
//! | [`StockSnapshot`] | Everything fetched for one symbol in one request |
//! | [`TimeHorizon`] | Trailing display window (5y, 1y, 6m, 1m) |
//!
//! Constructors validate numeric fields and return [`crate::ValidationError`]
//! on non-finite or negative values.

mod horizon;
mod models;
mod ticker;

pub use horizon::TimeHorizon;
pub use models::{OptionsSummary, SeriesPoint, StockMetrics, StockSnapshot, SymbolEntry};
pub use ticker::Ticker;

pub(crate) use models::{validate_finite, validate_non_negative, validate_optional_finite};
