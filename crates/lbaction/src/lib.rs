//! lbaction - building blocks for LaunchBar actions.
//!
//! An action registers views of items, optional run handlers and named
//! functions, then turns one invocation into the JSON LaunchBar renders:
//!
//! ```no_run
//! use lbaction::{Action, ConfigValues, Output};
//!
//! let mut action = Action::from_env("Hello", ConfigValues::new()).unwrap();
//! action.init(std::env::args().skip(1));
//! action
//!     .new_view("main")
//!     .new_item("Say hello")
//!     .set_run(|ctx, _| Ok(Output::from(format!("hello {}", ctx.input.as_str()))));
//! println!("{}", action.run());
//! ```

pub mod action;
pub mod context;
pub mod env;
pub mod handler;
pub mod info;
pub mod item;
pub mod logging;
pub mod script;
pub mod update;
pub mod view;

pub use action::{Action, ActionError, Dispatch};
pub use context::Context;
pub use env::{Env, ScriptType};
pub use handler::{always, match_if, match_unless, never, show_view, HandlerError, HandlerResult, Output};
pub use info::ActionInfo;
pub use item::{Item, Items};
pub use lb_core::{Cache, CacheError, CacheRead, Config, ConfigError, ConfigValues, Input, ItemRecord, Version};
pub use view::{View, ViewMut};
