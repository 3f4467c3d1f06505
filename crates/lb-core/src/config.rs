//! Persistent per-action configuration.
//!
//! A single JSON object stored as `config.json` in the action's support
//! directory. The whole file is loaded on construction and rewritten on every
//! mutation; writes are atomic, so concurrent invocations can lose an update
//! but never leave a half-written file behind.

use crate::io::atomic_write;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name of the config store inside the support directory.
pub const CONFIG_FILE: &str = "config.json";

/// Loosely typed config values keyed by name.
pub type ConfigValues = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The action's persisted configuration.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: ConfigValues,
}

impl Config {
    /// An empty config that will be saved to `dir/config.json`.
    pub fn empty(dir: &Path) -> Self {
        Self {
            path: dir.join(CONFIG_FILE),
            data: ConfigValues::new(),
        }
    }

    /// Load `dir/config.json`. A missing file yields an empty config.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::empty(dir);
        let content = match std::fs::read(&config.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(config),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: config.path,
                    source,
                })
            }
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(config);
        }
        config.data = serde_json::from_slice(&content).map_err(|source| ConfigError::Parse {
            path: config.path.clone(),
            source,
        })?;
        Ok(config)
    }

    /// Load `dir/config.json` and fill in any keys missing from `defaults`.
    ///
    /// The merged config is saved immediately.
    pub fn with_defaults(dir: &Path, defaults: ConfigValues) -> Result<Self, ConfigError> {
        let mut config = Self::load(dir)?;
        config.merge_defaults(defaults)?;
        Ok(config)
    }

    /// Fill in keys that are not set yet and save.
    pub fn merge_defaults(&mut self, defaults: ConfigValues) -> Result<(), ConfigError> {
        for (key, value) in defaults {
            self.data.entry(key).or_insert(value);
        }
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &ConfigValues {
        &self.data
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String value, or `""` when missing or not a string.
    pub fn get_str(&self, key: &str) -> &str {
        self.data.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Integer value, or 0. Floats are truncated.
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.data.get(key) {
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Boolean value, or `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.data.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// A number of seconds as a `Duration`; zero when missing or negative,
    /// `Duration::MAX` when too large to represent.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.data
            .get(key)
            .and_then(Value::as_f64)
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map_or(Duration::ZERO, |secs| {
                Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
            })
    }

    /// Set `key` and save the whole file.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.data.insert(key.into(), value.into());
        self.save()
    }

    /// Remove `key` and save the whole file.
    pub fn delete(&mut self, key: &str) -> Result<(), ConfigError> {
        self.data.remove(key);
        self.save()
    }

    fn save(&self) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec_pretty(&self.data)?;
        atomic_write(&self.path, &bytes).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
