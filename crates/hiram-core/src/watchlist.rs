//! Persisted watch-list of tickers.
//!
//! The store owns the in-memory set and writes the full set through a
//! [`WatchlistBackend`] on every change, before returning to the caller.
//! Unreadable or corrupt persisted state loads as an empty watchlist.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{StorageError, Ticker, WatchlistConfig};

/// Key-value persistence used by [`WatchlistStore`].
pub trait WatchlistBackend: Send + Sync {
    /// Stored value for `key`, `None` when nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: WatchlistBackend + ?Sized> WatchlistBackend for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Process-local backend; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with a raw stored value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(HashMap::from([(key.into(), value.into())])),
        }
    }
}

impl WatchlistBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Read {
            key: key.to_owned(),
            message: String::from("memory backend lock poisoned"),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Write {
            key: key.to_owned(),
            message: String::from("memory backend lock poisoned"),
        })?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, String> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
        if !valid || key.starts_with('.') {
            return Err(format!("invalid storage key '{key}'"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl WatchlistBackend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read_error = |message: String| StorageError::Read {
            key: key.to_owned(),
            message,
        };

        let path = self.path_for(key).map_err(read_error)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(read_error(error.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_error = |message: String| StorageError::Write {
            key: key.to_owned(),
            message,
        };

        let path = self.path_for(key).map_err(write_error)?;
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));

        fs::create_dir_all(&self.dir).map_err(|e| write_error(e.to_string()))?;
        let written = fs::write(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(error) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                if cleanup.kind() != ErrorKind::NotFound {
                    log::warn!("could not remove {}: {cleanup}", tmp_path.display());
                }
            }
            return Err(write_error(error.to_string()));
        }
        Ok(())
    }
}

/// Set of watched tickers. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist(BTreeSet<Ticker>);

impl Watchlist {
    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.0.contains(ticker)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.0.iter()
    }
}

impl FromIterator<Ticker> for Watchlist {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct WatchlistStore<B> {
    backend: B,
    key: String,
    current: Watchlist,
}

impl<B: WatchlistBackend> WatchlistStore<B> {
    /// Open the store and load whatever is persisted under the configured key.
    pub fn open(backend: B, config: &WatchlistConfig) -> Self {
        let mut store = Self {
            backend,
            key: config.storage_key.clone(),
            current: Watchlist::default(),
        };
        store.load();
        store
    }

    /// Re-read persisted state. Never fails: missing, unreadable or corrupt
    /// state yields an empty watchlist, and entries that are not valid
    /// tickers are dropped individually.
    pub fn load(&mut self) -> &Watchlist {
        self.current = match self.backend.read(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => self.parse_entries(entries),
                Err(error) => {
                    log::warn!("discarding corrupt watchlist '{}': {error}", self.key);
                    Watchlist::default()
                }
            },
            Ok(None) => Watchlist::default(),
            Err(error) => {
                log::warn!("{error}; starting with an empty watchlist");
                Watchlist::default()
            }
        };
        &self.current
    }

    fn parse_entries(&self, entries: Vec<String>) -> Watchlist {
        entries
            .into_iter()
            .filter_map(|entry| match Ticker::parse(&entry) {
                Ok(ticker) => Some(ticker),
                Err(error) => {
                    log::warn!("dropping watchlist entry '{entry}' from '{}': {error}", self.key);
                    None
                }
            })
            .collect()
    }

    /// Add `ticker`, persisting the full set before returning.
    ///
    /// Adding a ticker that is already present changes nothing and does not
    /// write. On a failed write the in-memory set is left unchanged.
    pub fn add(&mut self, ticker: Ticker) -> Result<&Watchlist, StorageError> {
        if self.current.contains(&ticker) {
            return Ok(&self.current);
        }

        let mut next = self.current.clone();
        next.0.insert(ticker);

        let serialized = serde_json::to_string(&next).map_err(|error| StorageError::Write {
            key: self.key.clone(),
            message: error.to_string(),
        })?;
        self.backend.write(&self.key, &serialized)?;

        self.current = next;
        Ok(&self.current)
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.current.contains(ticker)
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.current
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
