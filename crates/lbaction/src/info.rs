//! Action metadata from `Contents/Info.plist`.
//!
//! The same shape describes the remote descriptor used by the update check,
//! which is just the Info.plist of the latest release.

use lb_core::Version;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to read {path}: {source}")]
pub struct InfoError {
    pub path: PathBuf,
    #[source]
    pub source: plist::Error,
}

/// The `LBDescription` dictionary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Description {
    /// URL of the remote Info.plist used for update checks.
    #[serde(rename = "LBUpdate")]
    pub update: Option<String>,
    #[serde(rename = "LBDownload")]
    pub download: Option<String>,
    #[serde(rename = "LBChangelog")]
    pub changelog: Option<String>,
    #[serde(rename = "LBSummary")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionInfo {
    #[serde(rename = "CFBundleIdentifier")]
    pub bundle_identifier: Option<String>,
    #[serde(rename = "CFBundleName")]
    pub bundle_name: Option<String>,
    #[serde(rename = "CFBundleVersion")]
    pub bundle_version: Option<String>,
    #[serde(rename = "LBDescription")]
    pub description: Option<Description>,
}

impl ActionInfo {
    /// Read `<action_path>/Contents/Info.plist`.
    pub fn load(action_path: &Path) -> Result<Self, InfoError> {
        let path = action_path.join("Contents").join("Info.plist");
        plist::from_file(&path).map_err(|source| InfoError { path, source })
    }

    /// Parse an in-memory property list (XML or binary).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, plist::Error> {
        plist::from_bytes(bytes)
    }

    /// `CFBundleVersion`, empty when missing.
    pub fn version(&self) -> Version {
        Version::new(self.bundle_version.clone().unwrap_or_default())
    }

    pub fn update_url(&self) -> Option<&str> {
        self.description_field(|d| d.update.as_deref())
    }

    pub fn download_url(&self) -> Option<&str> {
        self.description_field(|d| d.download.as_deref())
    }

    pub fn changelog(&self) -> Option<&str> {
        self.description_field(|d| d.changelog.as_deref())
    }

    fn description_field<'a>(&'a self, f: impl Fn(&'a Description) -> Option<&'a str>) -> Option<&'a str> {
        self.description
            .as_ref()
            .and_then(f)
            .filter(|s| !s.trim().is_empty())
    }
}
