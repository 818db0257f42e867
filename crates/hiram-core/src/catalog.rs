//! Symbol catalog and the picker state built on top of it.

use std::sync::Arc;

use crate::api::SymbolSource;
use crate::cache::CacheStore;
use crate::{FetchError, SymbolEntry, Ticker};

const CATALOG_CACHE_KEY: &str = "symbols";

/// Session-scoped list of tradable symbols.
///
/// The first successful `fetch_all` is reused for the life of the catalog;
/// concurrent callers share one request.
#[derive(Clone)]
pub struct SymbolCatalog {
    source: Arc<dyn SymbolSource>,
    cache: CacheStore<Arc<[SymbolEntry]>>,
}

impl SymbolCatalog {
    pub fn new(source: Arc<dyn SymbolSource>) -> Self {
        Self {
            source,
            cache: CacheStore::new(),
        }
    }

    pub async fn fetch_all(&self) -> Result<Arc<[SymbolEntry]>, FetchError> {
        self.cache
            .get_or_try_fetch(CATALOG_CACHE_KEY, || async {
                let symbols = self.source.fetch_symbols().await?;
                Ok::<_, FetchError>(Arc::from(symbols))
            })
            .await
    }

    /// Symbols already fetched in this session, without issuing a request.
    pub async fn cached(&self) -> Option<Arc<[SymbolEntry]>> {
        self.cache.get(CATALOG_CACHE_KEY).await
    }
}

/// Whether every whitespace-separated word of `query` occurs inside some
/// word of `label`, ignoring case.
pub fn matches_query(label: &str, query: &str) -> bool {
    let label = label.to_lowercase();
    let words: Vec<&str> = label.split_whitespace().collect();

    query
        .to_lowercase()
        .split_whitespace()
        .all(|needle| words.iter().any(|word| word.contains(needle)))
}

/// Entries whose picker label matches `query`, in catalog order.
pub fn filter_symbols<'a>(symbols: &'a [SymbolEntry], query: &str) -> Vec<&'a SymbolEntry> {
    symbols
        .iter()
        .filter(|entry| matches_query(&entry.label(), query))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickerState {
    Loading,
    Ready(Arc<[SymbolEntry]>),
    /// No interaction is possible until the catalog loads.
    Unavailable { message: String },
}

/// Selectable option shown by the symbol picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub value: Ticker,
    pub label: String,
}

/// Symbol picker backed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPicker {
    state: PickerState,
}

impl Default for SymbolPicker {
    fn default() -> Self {
        Self {
            state: PickerState::Loading,
        }
    }
}

impl SymbolPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or reload after a failure) from `catalog`.
    pub async fn load(&mut self, catalog: &SymbolCatalog) -> &PickerState {
        self.state = PickerState::Loading;
        self.apply(catalog.fetch_all().await)
    }

    /// Record the outcome of a catalog fetch.
    pub fn apply(&mut self, result: Result<Arc<[SymbolEntry]>, FetchError>) -> &PickerState {
        self.state = match result {
            Ok(symbols) => PickerState::Ready(symbols),
            Err(error) => {
                log::warn!("symbol catalog unavailable: {error}");
                PickerState::Unavailable {
                    message: format!("Error loading data. {}", error.message()),
                }
            }
        };
        &self.state
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, PickerState::Ready(_))
    }

    pub fn blocking_message(&self) -> Option<&str> {
        match &self.state {
            PickerState::Unavailable { message } => Some(message),
            _ => None,
        }
    }

    /// Options matching `query`; empty unless the catalog is loaded.
    pub fn options(&self, query: &str) -> Vec<PickerOption> {
        let PickerState::Ready(symbols) = &self.state else {
            return Vec::new();
        };

        filter_symbols(symbols, query)
            .into_iter()
            .map(|entry| PickerOption {
                value: entry.ticker.clone(),
                label: entry.label(),
            })
            .collect()
    }

    pub fn find(&self, ticker: &Ticker) -> Option<&SymbolEntry> {
        match &self.state {
            PickerState::Ready(symbols) => symbols.iter().find(|entry| &entry.ticker == ticker),
            _ => None,
        }
    }
}
