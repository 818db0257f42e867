use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Ticker, ValidationError};

/// Tradable symbol listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub ticker: Ticker,
    pub display_name: String,
}

impl SymbolEntry {
    pub fn new(ticker: Ticker, display_name: impl Into<String>) -> Self {
        Self {
            ticker,
            display_name: display_name.into(),
        }
    }

    /// Picker label, `"AAPL - Apple Inc."`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.ticker, self.display_name)
    }
}

/// One day of normalized price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: Date,
    pub close: f64,
    pub volume: u64,
    pub cumulative_return: f64,
}

impl SeriesPoint {
    pub fn new(
        date: Date,
        close: f64,
        volume: u64,
        cumulative_return: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        validate_finite("cumulative_return", cumulative_return)?;

        Ok(Self {
            date,
            close,
            volume,
            cumulative_return,
        })
    }
}

/// Fundamental and technical metrics computed server-side over the full history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub moving_average_50: Option<f64>,
    pub moving_average_200: Option<f64>,
    pub rsi: Option<f64>,
    pub historical_volatility: Option<f64>,
}

/// Listed options overview for the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsSummary {
    pub put_call_ratio: f64,
    pub nearest_expiry: Date,
    pub expiry_dates: Vec<Date>,
}

/// Price history plus metrics for one symbol as of one fetch.
///
/// Snapshots are replaced wholesale on re-fetch and never mutated; the
/// orchestrator shares them behind an [`Arc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub ticker: Ticker,
    pub current_price: f64,
    pub series: Vec<SeriesPoint>,
    pub metrics: StockMetrics,
    pub options_summary: Option<OptionsSummary>,
}

impl StockSnapshot {
    pub fn new(
        ticker: Ticker,
        current_price: f64,
        series: Vec<SeriesPoint>,
        metrics: StockMetrics,
        options_summary: Option<OptionsSummary>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", current_price)?;

        Ok(Self {
            ticker,
            current_price,
            series,
            metrics,
            options_summary,
        })
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn first_date(&self) -> Option<Date> {
        self.series.first().map(|point| point.date)
    }

    pub fn last_date(&self) -> Option<Date> {
        self.series.last().map(|point| point.date)
    }
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

pub(crate) fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

pub(crate) fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        validate_finite(field, value)?;
    }
    Ok(())
}
