//! Accessors for the `LB_*` environment LaunchBar sets for an action.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

pub const ACTION_PATH: &str = "LB_ACTION_PATH";
pub const CACHE_PATH: &str = "LB_CACHE_PATH";
pub const SUPPORT_PATH: &str = "LB_SUPPORT_PATH";
pub const LAUNCHBAR_PATH: &str = "LB_LAUNCHBAR_PATH";
pub const DEBUG_LOG_ENABLED: &str = "LB_DEBUG_LOG_ENABLED";
pub const SCRIPT_TYPE: &str = "LB_SCRIPT_TYPE";
pub const COMMAND_KEY: &str = "LB_OPTION_COMMAND_KEY";
pub const ALTERNATE_KEY: &str = "LB_OPTION_ALTERNATE_KEY";
pub const SHIFT_KEY: &str = "LB_OPTION_SHIFT_KEY";
pub const CONTROL_KEY: &str = "LB_OPTION_CONTROL_KEY";
pub const RUN_IN_BACKGROUND: &str = "LB_OPTION_RUN_IN_BACKGROUND";

/// Script type declared in the action's Info.plist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Default,
    Suggestions,
    ActionUrl,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Suggestions => "suggestions",
            Self::ActionUrl => "actionURL",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "suggestions" => Some(Self::Suggestions),
            "actionURL" => Some(Self::ActionUrl),
            _ => None,
        }
    }
}

/// Snapshot of the LaunchBar-provided environment.
///
/// Empty variables are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Capture the `LB_*` variables of the current process.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Keep the `LB_*` pairs that are valid UTF-8; everything else is skipped.
    fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            if !key.starts_with("LB_") {
                return None;
            }
            Some((key, value.into_string().ok()?))
        }))
    }

    /// Build from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn flag(&self, key: &str) -> bool {
        self.var(key) == Some("1")
    }

    /// Absolute path to the `.lbaction` bundle.
    pub fn action_path(&self) -> Option<&Path> {
        self.var(ACTION_PATH).map(Path::new)
    }

    /// The action's cache directory. LaunchBar creates it before running
    /// the action; it may be cleared between runs.
    pub fn cache_path(&self) -> Option<&Path> {
        self.var(CACHE_PATH).map(Path::new)
    }

    /// The action's support directory, for data that must persist.
    pub fn support_path(&self) -> Option<&Path> {
        self.var(SUPPORT_PATH).map(Path::new)
    }

    /// Path to the LaunchBar.app bundle.
    pub fn launchbar_path(&self) -> Option<&Path> {
        self.var(LAUNCHBAR_PATH).map(Path::new)
    }

    /// `LBDebugLogEnabled` from the action's Info.plist.
    pub fn is_debug(&self) -> bool {
        self.var(DEBUG_LOG_ENABLED) == Some("true")
    }

    pub fn script_type(&self) -> Option<ScriptType> {
        self.var(SCRIPT_TYPE).and_then(ScriptType::parse)
    }

    pub fn is_command_key(&self) -> bool {
        self.flag(COMMAND_KEY)
    }

    /// Alternate (Option) key.
    pub fn is_option_key(&self) -> bool {
        self.flag(ALTERNATE_KEY)
    }

    pub fn is_shift_key(&self) -> bool {
        self.flag(SHIFT_KEY)
    }

    pub fn is_control_key(&self) -> bool {
        self.flag(CONTROL_KEY)
    }

    /// Whether the action runs in the background.
    pub fn is_background(&self) -> bool {
        self.flag(RUN_IN_BACKGROUND)
    }
}
