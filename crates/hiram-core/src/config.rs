//! Runtime configuration.
//!
//! The backend base URL (and its timeout) are the only settings read from
//! the environment.

use std::env;

pub const BASE_URL_ENV: &str = "HIRAM_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "HIRAM_API_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_WATCHLIST_KEY: &str = "hiram.watchlist";

/// Market-data service connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("hiram/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `HIRAM_API_BASE_URL` / `HIRAM_API_TIMEOUT_MS`.
    ///
    /// An unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(base_url);
            }
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config.timeout_ms = timeout_ms,
                _ => log::warn!("ignoring invalid {TIMEOUT_ENV} value '{raw}'"),
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Absolute URL for an API path such as `/symbols`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Watchlist persistence settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistConfig {
    pub storage_key: String,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage_key: String::from(DEFAULT_WATCHLIST_KEY),
        }
    }
}

impl WatchlistConfig {
    pub fn with_storage_key(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
        }
    }
}
