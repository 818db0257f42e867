use thiserror::Error;

/// Validation and contract errors exposed by `hiram-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid horizon '{value}', expected one of 5y, 1y, 6m, 1m")]
    InvalidHorizon { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("no symbol selected")]
    NoSymbolSelected,
    #[error("analysis cannot run while {state}")]
    AnalysisNotRunnable { state: &'static str },

    #[error("volatility window must be at least 2 points, got {window}")]
    InvalidVolatilityWindow { window: usize },
}

/// Server payload did not match the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed payload: {message}")]
    Malformed { message: String },
    #[error("invalid date value '{value}'")]
    InvalidDate { value: String },
    #[error("series dates must be strictly increasing: '{current}' follows '{previous}' at index {index}")]
    UnorderedSeries {
        index: usize,
        previous: String,
        current: String,
    },
    #[error(transparent)]
    InvalidField(#[from] ValidationError),
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed {
            message: value.to_string(),
        }
    }
}

/// Failure of a remote market-data call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Short text suitable for an inline user-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::Network { message } => format!("Could not reach the market data service: {message}"),
            Self::Decode(error) => format!("Market data response was not understood: {error}"),
        }
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Watchlist persistence failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage read failed for '{key}': {message}")]
    Read { key: String, message: String },
    #[error("storage write failed for '{key}': {message}")]
    Write { key: String, message: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
