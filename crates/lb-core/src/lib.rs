//! Core building blocks for LaunchBar actions.
//!
//! The item wire model, the expiring file cache, the JSON config store and
//! input decoding. Nothing here knows about views or handlers; see the
//! `lbaction` crate for those.

pub mod cache;
pub mod config;
pub mod input;
pub mod io;
pub mod types;
pub mod version;

pub use cache::{Cache, CacheError, CacheRead};
pub use config::{Config, ConfigError, ConfigValues};
pub use input::Input;
pub use types::{ItemData, ItemRecord};
pub use version::Version;
