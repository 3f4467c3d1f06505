//! Remote update check.
//!
//! The action's Info.plist names a remote descriptor (`LBDescription.LBUpdate`),
//! which is the Info.plist of the latest release. The check fetches it and
//! reports the remote version, download link and changelog as JSON.
//!
//! A check in progress is recorded in the config under [`START_KEY`] so that
//! a second invocation within [`GUARD_WINDOW_SECS`] does not fetch again.

use crate::context::Context;
use crate::handler::{HandlerResult, Output};
use crate::info::ActionInfo;
use chrono::Utc;
use lb_core::{ConfigError, ItemRecord, Version};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the built-in function registered on every action.
pub const UPDATE_FUNC: &str = "update";

/// Config key holding the unix time the running check started at.
pub const START_KEY: &str = "updateStartTime";

pub const GUARD_WINDOW_SECS: i64 = 180;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update check in progress (started {0}s ago)")]
    InProgress(i64),
    #[error("action has no LBUpdate link")]
    NoUpdateUrl,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid descriptor: {0}")]
    Parse(#[from] plist::Error),
    #[error("cannot get the remote version")]
    MissingVersion,
    #[error("cannot get the remote download link")]
    MissingDownload,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl UpdateError {
    /// Short label reported in the `error` field.
    pub fn short(&self) -> &'static str {
        match self {
            Self::InProgress(_) => "update in progress",
            Self::NoUpdateUrl | Self::Http(_) | Self::Status(_) => "cannot get updateLink",
            Self::Parse(_) => "cannot parse updateLink",
            Self::MissingVersion => "no remote version",
            Self::MissingDownload => "no remote download",
            Self::Config(_) => "cannot save update state",
        }
    }
}

/// What the remote descriptor announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: Version,
    pub download: String,
    pub changelog: String,
    /// Remote version is newer than the running one.
    pub available: bool,
}

/// Extract the release from a remote descriptor.
pub fn parse_release(bytes: &[u8], current: &Version) -> Result<Release, UpdateError> {
    let remote = ActionInfo::from_bytes(bytes)?;
    let version = remote
        .bundle_version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Version::from)
        .ok_or(UpdateError::MissingVersion)?;
    let download = remote
        .download_url()
        .ok_or(UpdateError::MissingDownload)?
        .to_string();
    let changelog = remote.changelog().unwrap_or_default().to_string();
    let available = &version > current;

    Ok(Release {
        version,
        download,
        changelog,
        available,
    })
}

/// GET the descriptor; any status from 300 up is an error.
pub fn fetch_descriptor(url: &str) -> Result<Vec<u8>, UpdateError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status().as_u16();
    if status >= 300 {
        return Err(UpdateError::Status(status));
    }
    Ok(response.bytes()?.to_vec())
}

/// Run the update check over HTTP.
pub fn check(ctx: &mut Context) -> Result<Release, UpdateError> {
    check_with(ctx, fetch_descriptor)
}

/// Run the update check with a custom descriptor source.
pub fn check_with<F>(ctx: &mut Context, fetch: F) -> Result<Release, UpdateError>
where
    F: FnOnce(&str) -> Result<Vec<u8>, UpdateError>,
{
    let url = ctx
        .info
        .update_url()
        .ok_or(UpdateError::NoUpdateUrl)?
        .to_string();

    let now = Utc::now().timestamp();
    let started = ctx.config.get_i64(START_KEY);
    if started > 0 {
        let elapsed = now - started;
        if (0..GUARD_WINDOW_SECS).contains(&elapsed) {
            return Err(UpdateError::InProgress(elapsed));
        }
    }

    ctx.config.set(START_KEY, now)?;
    debug!(url = %url, "checking for update");
    let result = fetch(&url).and_then(|bytes| parse_release(&bytes, &ctx.version()));
    if let Err(e) = ctx.config.set(START_KEY, 0) {
        warn!(error = %e, "failed to clear update guard");
    }
    result
}

/// JSON report of a check.
///
/// Success: `{"error": "", "version", "download", "changelog", "available"}`.
/// Failure: `{"error": <short label>, "description": <detail>}`.
pub fn report(result: &Result<Release, UpdateError>) -> String {
    let value = match result {
        Ok(release) => json!({
            "error": "",
            "version": release.version.as_str(),
            "download": release.download,
            "changelog": release.changelog,
            "available": release.available,
        }),
        Err(e) => json!({
            "error": e.short(),
            "description": e.to_string(),
        }),
    };
    value.to_string()
}

/// The built-in `update` function.
pub fn run(ctx: &mut Context, _item: &ItemRecord) -> HandlerResult {
    let result = check(ctx);
    if let Err(e) = &result {
        warn!(error = %e, "update check failed");
    }
    Ok(Output::Text(report(&result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use crate::info::tests::INFO_PLIST;
    use lb_core::{Cache, Config};
    use serde_json::Value;
    use tempfile::TempDir;

    fn descriptor(version: &str, download: Option<&str>) -> String {
        let download = download
            .map(|d| format!("<key>LBDownload</key><string>{d}</string>"))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>CFBundleVersion</key><string>{version}</string>
    <key>LBDescription</key>
    <dict>
        {download}
        <key>LBChangelog</key><string>https://example.com/changes</string>
    </dict>
</dict>
</plist>"#
        )
    }

    fn context(dir: &TempDir) -> Context {
        Context::new(
            "Demo",
            Env::default(),
            ActionInfo::from_bytes(INFO_PLIST.as_bytes()).unwrap(),
            Config::empty(dir.path()),
            Cache::new(dir.path()),
        )
    }

    #[test]
    fn newer_remote_version_is_available() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut requested = String::new();

        let release = check_with(&mut ctx, |url| {
            requested = url.to_string();
            Ok(descriptor("1.10", Some("https://example.com/Demo.zip")).into_bytes())
        })
        .unwrap();

        assert_eq!(requested, "https://example.com/Info.plist");
        assert_eq!(release.version.as_str(), "1.10");
        assert_eq!(release.download, "https://example.com/Demo.zip");
        assert_eq!(release.changelog, "https://example.com/changes");
        assert!(release.available);
        assert_eq!(ctx.config.get_i64(START_KEY), 0);
    }

    #[test]
    fn same_version_is_not_available() {
        let bytes = descriptor("1.2", Some("https://example.com/Demo.zip"));
        let release = parse_release(bytes.as_bytes(), &Version::from("1.2.0")).unwrap();
        assert!(!release.available);
    }

    #[test]
    fn missing_download_is_reported() {
        let bytes = descriptor("2.0", None);
        let err = parse_release(bytes.as_bytes(), &Version::from("1.0")).unwrap_err();
        assert!(matches!(err, UpdateError::MissingDownload));
        assert_eq!(err.short(), "no remote download");
    }

    #[test]
    fn recent_check_blocks_new_one() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        ctx.config
            .set(START_KEY, Utc::now().timestamp() - 10)
            .unwrap();

        let result = check_with(&mut ctx, |_| panic!("must not fetch"));
        assert!(matches!(result, Err(UpdateError::InProgress(_))));

        let parsed: Value = serde_json::from_str(&report(&result)).unwrap();
        assert_eq!(parsed["error"], "update in progress");
    }

    #[test]
    fn stale_guard_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        ctx.config
            .set(START_KEY, Utc::now().timestamp() - GUARD_WINDOW_SECS - 5)
            .unwrap();

        let result = check_with(&mut ctx, |_| Err(UpdateError::Status(404)));
        assert!(matches!(result, Err(UpdateError::Status(404))));
        assert_eq!(ctx.config.get_i64(START_KEY), 0);
    }

    #[test]
    fn missing_update_link() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        ctx.info = ActionInfo::default();

        let result = check_with(&mut ctx, |_| panic!("must not fetch"));
        let parsed: Value = serde_json::from_str(&report(&result)).unwrap();
        assert_eq!(parsed["error"], "cannot get updateLink");
        assert!(parsed["description"].as_str().unwrap().contains("LBUpdate"));
    }

    #[test]
    fn success_report_shape() {
        let release = Release {
            version: Version::from("2.0"),
            download: "https://example.com/Demo.zip".into(),
            changelog: String::new(),
            available: true,
        };
        let parsed: Value = serde_json::from_str(&report(&Ok(release))).unwrap();

        assert_eq!(parsed["error"], "");
        assert_eq!(parsed["version"], "2.0");
        assert_eq!(parsed["available"], true);
        assert!(parsed.get("description").is_none());
    }
}
