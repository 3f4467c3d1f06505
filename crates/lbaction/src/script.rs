//! AppleScript bridge used to make LaunchBar re-run the action.

use crate::context::Context;
use crate::view::VIEW_CONFIG_KEY;
use lb_core::ConfigError;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to store active view: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start osascript: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Script asking LaunchBar to stay open and perform `action` again.
pub fn perform_action_script(action: &str) -> String {
    let escaped = action.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "tell application \"LaunchBar\"\n  remain active\n  perform action \"{escaped}\"\nend tell"
    )
}

/// Store `view` as the active view and ask LaunchBar to run the action again.
///
/// `osascript` is started and not waited for; the current invocation keeps
/// running and its output is replaced by the new run.
#[allow(clippy::zombie_processes)]
pub fn show_view(ctx: &mut Context, view: &str) -> Result<(), ScriptError> {
    ctx.config.set(VIEW_CONFIG_KEY, view)?;
    debug!(action = %ctx.name, view, "re-running action");
    Command::new("osascript")
        .arg("-e")
        .arg(perform_action_script(&ctx.name))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
