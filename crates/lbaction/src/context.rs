//! Shared state handed to every match, render and run callback.

use crate::env::Env;
use crate::info::ActionInfo;
use crate::script::{self, ScriptError};
use lb_core::{Cache, Config, Input, Version};

/// Everything a callback may consult during one invocation.
#[derive(Debug)]
pub struct Context {
    /// Action name, as LaunchBar knows it (used by `show_view`).
    pub name: String,
    pub env: Env,
    pub info: ActionInfo,
    pub config: Config,
    pub cache: Cache,
    pub input: Input,
}

impl Context {
    pub fn new(
        name: impl Into<String>,
        env: Env,
        info: ActionInfo,
        config: Config,
        cache: Cache,
    ) -> Self {
        Self {
            name: name.into(),
            env,
            info,
            config,
            cache,
            input: Input::default(),
        }
    }

    /// Version of the running action (`CFBundleVersion`).
    pub fn version(&self) -> Version {
        self.info.version()
    }

    /// Make `view` the active view and ask LaunchBar to run the action again.
    pub fn show_view(&mut self, view: &str) -> Result<(), ScriptError> {
        script::show_view(self, view)
    }
}
