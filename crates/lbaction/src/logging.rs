//! Tracing setup for actions.
//!
//! Stdout carries the JSON LaunchBar reads, so logs are appended to
//! `error.log` in the support directory instead, falling back to stderr.

use crate::env::Env;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name inside the support directory.
pub const LOG_FILE: &str = "error.log";

/// Level used when `RUST_LOG` is not set.
pub fn default_directive(env: &Env) -> &'static str {
    if env.is_debug() {
        "debug"
    } else {
        "info"
    }
}

/// Open `dir/error.log` for appending, creating it if needed.
pub fn open_log_file(dir: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(env: &Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(env)));

    let writer = match env.support_path().map(open_log_file) {
        Some(Ok(file)) => BoxMakeWriter::new(Mutex::new(file)),
        Some(Err(e)) => {
            eprintln!("cannot open {LOG_FILE}: {e}");
            BoxMakeWriter::new(std::io::stderr)
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}
