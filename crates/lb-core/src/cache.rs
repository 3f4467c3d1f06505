//! Expiring JSON cache, one file per key.
//!
//! Each entry is stored as `{"expiry": <RFC 3339>, "data": <payload>}` under
//! the cache root. Expiry is checked when reading; expired files are left on
//! disk and their payload is still handed back so callers can show stale
//! data while refreshing.

use crate::io::atomic_write;
use crate::types::ItemRecord;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache entry does not exist: {0}")]
    NotFound(String),
    #[error("cache entry is corrupted: {key}: {reason}")]
    Corrupted { key: String, reason: String },
    #[error("cache entry expired at {expiry}")]
    Expired { expiry: DateTime<Utc> },
    #[error("invalid cache key: {0:?}")]
    InvalidKey(String),
    #[error("failed to write cache entry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cache ttl out of range: {0}")]
    TtlOutOfRange(Duration),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// A successful read, fresh or past its expiry.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRead<T> {
    Fresh { data: T, expiry: DateTime<Utc> },
    Expired { data: T, expiry: DateTime<Utc> },
}

impl<T> CacheRead<T> {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        match self {
            Self::Fresh { expiry, .. } | Self::Expired { expiry, .. } => *expiry,
        }
    }

    /// The payload regardless of expiry.
    pub fn into_data(self) -> T {
        match self {
            Self::Fresh { data, .. } | Self::Expired { data, .. } => data,
        }
    }

    /// The payload, or `CacheError::Expired` for stale entries.
    pub fn into_fresh(self) -> Result<T> {
        match self {
            Self::Fresh { data, .. } => Ok(data),
            Self::Expired { expiry, .. } => Err(CacheError::Expired { expiry }),
        }
    }

    fn classify(data: T, expiry: DateTime<Utc>) -> Self {
        if Utc::now() > expiry {
            Self::Expired { data, expiry }
        } else {
            Self::Fresh { data, expiry }
        }
    }
}

#[derive(Serialize)]
struct DataEnvelopeRef<'a, T> {
    expiry: DateTime<Utc>,
    data: &'a T,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    expiry: DateTime<Utc>,
    data: T,
}

#[derive(Serialize)]
struct ItemsEnvelopeRef<'a> {
    expiry: DateTime<Utc>,
    items: &'a [ItemRecord],
}

#[derive(Deserialize)]
struct ItemsEnvelope {
    expiry: DateTime<Utc>,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

/// File-backed cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `data` under `key` until `now + ttl`, replacing any previous entry.
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> Result<()> {
        let envelope = DataEnvelopeRef {
            expiry: expiry_after(ttl)?,
            data,
        };
        self.write_entry(key, &envelope)
    }

    /// Read the entry for `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<CacheRead<T>> {
        let envelope: DataEnvelope<T> = self.read_entry(key)?;
        Ok(CacheRead::classify(envelope.data, envelope.expiry))
    }

    /// Store a list of items using the `items` envelope.
    pub fn set_items(&self, key: &str, items: &[ItemRecord], ttl: Duration) -> Result<()> {
        let envelope = ItemsEnvelopeRef {
            expiry: expiry_after(ttl)?,
            items,
        };
        self.write_entry(key, &envelope)
    }

    /// Read a list of items stored with [`Cache::set_items`].
    pub fn get_items_with_info(&self, key: &str) -> Result<CacheRead<Vec<ItemRecord>>> {
        let envelope: ItemsEnvelope = self.read_entry(key)?;
        Ok(CacheRead::classify(envelope.items, envelope.expiry))
    }

    /// Cached items, fresh or stale, or `None` when there is no usable entry.
    pub fn get_items(&self, key: &str) -> Option<Vec<ItemRecord>> {
        self.get_items_with_info(key).ok().map(CacheRead::into_data)
    }

    /// Remove the entry for `key`.
    ///
    /// Only regular files directly inside the cache root are removed. Keys
    /// that resolve anywhere else, missing keys, and directories are ignored.
    pub fn delete(&self, key: &str) {
        let Some(path) = self.entry_path(key) else {
            return;
        };
        let Ok(meta) = std::fs::symlink_metadata(&path) else {
            return;
        };
        if meta.is_file() && path.parent() == Some(self.root.as_path()) {
            if let Err(e) = remove_entry(&path) {
                debug!(key, error = %e, "failed to remove cache entry");
            }
        }
    }

    /// Resolve `key` to a path, if it names a single file inside the root.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == key => Some(self.root.join(name)),
            _ => None,
        }
    }

    fn write_entry<E: Serialize>(&self, key: &str, envelope: &E) -> Result<()> {
        let path = self
            .entry_path(key)
            .ok_or_else(|| CacheError::InvalidKey(key.to_string()))?;
        let bytes = serde_json::to_vec(envelope)?;
        atomic_write(&path, &bytes)?;
        Ok(())
    }

    fn read_entry<E: DeserializeOwned>(&self, key: &str) -> Result<E> {
        let path = self
            .entry_path(key)
            .ok_or_else(|| CacheError::InvalidKey(key.to_string()))?;
        if !path.is_file() {
            return Err(CacheError::NotFound(key.to_string()));
        }
        let corrupted = |reason: String| CacheError::Corrupted {
            key: key.to_string(),
            reason,
        };
        let bytes = std::fs::read(&path).map_err(|e| corrupted(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| corrupted(e.to_string()))
    }
}

/// `now + ttl`, or an error when the result leaves chrono's date range.
fn expiry_after(ttl: Duration) -> Result<DateTime<Utc>> {
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or(CacheError::TtlOutOfRange(ttl))
}

/// Remove a file; a file that is already gone is not an error.
fn remove_entry(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
