//! The action: view and function registries plus per-invocation dispatch.
//!
//! One [`Action`] handles exactly one LaunchBar invocation. Views, items and
//! functions are registered up front, the input is set with [`Action::init`],
//! and [`Action::run`] returns the JSON to print.
//!
//! Dispatch order:
//! 1. input item with `x-func`: call the registered function;
//! 2. input item whose `x-id` names an item with a run handler: call it;
//! 3. otherwise compile the active view joined with the wildcard view.

use crate::context::Context;
use crate::env::Env;
use crate::handler::{HandlerResult, Output, RunFn};
use crate::info::{ActionInfo, InfoError};
use crate::item::Item;
use crate::update;
use crate::view::{View, ViewMut, DEFAULT_VIEW, VIEW_CONFIG_KEY, WILDCARD_VIEW};
use lb_core::types::error_items_json;
use lb_core::{Cache, Config, ConfigError, ConfigValues, Input, ItemRecord, Version};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Info(#[from] InfoError),
}

/// Which branch an invocation takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Call a registered function.
    Function(String),
    /// The input names a function that is not registered.
    UnknownFunction(String),
    /// Run the handler of a registered item.
    ItemHandler(i64),
    /// Compile the named view.
    View(String),
}

pub struct Action {
    ctx: Context,
    views: HashMap<String, View>,
    items: Vec<Item>,
    funcs: HashMap<String, RunFn>,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut funcs: Vec<&String> = self.funcs.keys().collect();
        funcs.sort();
        f.debug_struct("Action")
            .field("ctx", &self.ctx)
            .field("views", &self.views)
            .field("items", &self.items.len())
            .field("funcs", &funcs)
            .finish()
    }
}

impl Action {
    /// Build an action from an explicit environment.
    ///
    /// Config is loaded from the support directory and `defaults` fills in
    /// missing keys. A config file that cannot be parsed is replaced by an
    /// empty one. Info.plist is read when `LB_ACTION_PATH` is set.
    pub fn new(name: impl Into<String>, env: Env, defaults: ConfigValues) -> Result<Self, ActionError> {
        let name = name.into();
        let support = env.support_path().unwrap_or(Path::new(".")).to_path_buf();
        let cache = Cache::new(env.cache_path().unwrap_or(Path::new(".")));

        let mut config = match Config::load(&support) {
            Ok(config) => config,
            Err(e @ ConfigError::Parse { .. }) => {
                warn!(error = %e, "ignoring unreadable config");
                Config::empty(&support)
            }
            Err(e) => return Err(e.into()),
        };
        if !defaults.is_empty() {
            config.merge_defaults(defaults)?;
        }

        let info = match env.action_path() {
            Some(path) => ActionInfo::load(path)?,
            None => ActionInfo::default(),
        };
        debug!(action = %name, version = %info.version(), "action loaded");

        let mut action = Self {
            ctx: Context::new(name, env, info, config, cache),
            views: HashMap::new(),
            items: Vec::new(),
            funcs: HashMap::new(),
        };
        action.register_func(update::UPDATE_FUNC, update::run);
        Ok(action)
    }

    /// Build an action from the process environment.
    pub fn from_env(name: impl Into<String>, defaults: ConfigValues) -> Result<Self, ActionError> {
        Self::new(name, Env::from_env(), defaults)
    }

    /// Decode the invocation arguments (without the program name).
    pub fn init<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_input(Input::from_args(args))
    }

    pub fn set_input(&mut self, input: Input) -> &mut Self {
        self.ctx.input = input;
        self
    }

    /// Register a function callable through an item's `x-func`.
    pub fn register_func<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut Context, &ItemRecord) -> HandlerResult + 'static,
    {
        self.funcs.insert(name.into(), Rc::new(f));
        self
    }

    /// Register an empty view, replacing any view with the same name.
    ///
    /// Items of a replaced view stay in the registry: ids are positions in
    /// it, so they are never reused, and an item emitted before the
    /// replacement still reaches its run handler when LaunchBar hands it back.
    pub fn new_view(&mut self, name: impl Into<String>) -> ViewMut<'_> {
        let view = match self.views.entry(name.into()) {
            Entry::Occupied(entry) => {
                let view = entry.into_mut();
                warn!(
                    view = %view.name,
                    dropped = view.items.len(),
                    "view registered twice, replacing its items"
                );
                view.items.clear();
                view
            }
            Entry::Vacant(entry) => {
                let name = entry.key().clone();
                entry.insert(View::new(name))
            }
        };
        ViewMut {
            view,
            registry: &mut self.items,
            config: &self.ctx.config,
        }
    }

    /// Registration handle for an existing view.
    pub fn view(&mut self, name: &str) -> Option<ViewMut<'_>> {
        let view = self.views.get_mut(name)?;
        Some(ViewMut {
            view,
            registry: &mut self.items,
            config: &self.ctx.config,
        })
    }

    pub fn get_view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    /// Registered item by id; `None` for ids below 1 or past the last item.
    pub fn item(&self, id: i64) -> Option<&Item> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.items.get(index)
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn name(&self) -> &str {
        &self.ctx.name
    }

    pub fn version(&self) -> Version {
        self.ctx.version()
    }

    /// Name of the view rendered by default: config `view`, else `main`.
    pub fn active_view(&self) -> &str {
        match self.ctx.config.get_str(VIEW_CONFIG_KEY) {
            "" => DEFAULT_VIEW,
            name => name,
        }
    }

    /// Decide which branch the current input takes.
    pub fn dispatch(&self) -> Dispatch {
        let input = &self.ctx.input;
        if let Some(name) = input.func_name() {
            return if self.funcs.contains_key(name) {
                Dispatch::Function(name.to_string())
            } else {
                Dispatch::UnknownFunction(name.to_string())
            };
        }
        if let Some(id) = input.item_id() {
            if self.item(id).is_some_and(Item::has_run) {
                return Dispatch::ItemHandler(id);
            }
        }
        Dispatch::View(self.active_view().to_string())
    }

    /// Handle the invocation and return the JSON for LaunchBar.
    pub fn run(&mut self) -> String {
        let dispatch = self.dispatch();
        debug!(?dispatch, input = self.ctx.input.raw(), "dispatching");

        match dispatch {
            Dispatch::Function(name) => {
                let Some(func) = self.funcs.get(&name).cloned() else {
                    return unknown_function(&name);
                };
                let record = self.ctx.input.item().cloned().unwrap_or_default();
                let result = func(&mut self.ctx, &record);
                self.render_output(result)
            }
            Dispatch::UnknownFunction(name) => unknown_function(&name),
            Dispatch::ItemHandler(id) => {
                let Some((run, record)) = self.redelivered(id) else {
                    let name = self.active_view().to_string();
                    return self.render_view(&name);
                };
                let result = run(&mut self.ctx, &record);
                self.render_output(result)
            }
            Dispatch::View(name) => self.render_view(&name),
        }
    }

    /// Compile a single view through the match/render/sort pipeline.
    pub fn compile_view(&mut self, name: &str) -> Option<String> {
        let view = self.views.get(name)?;
        Some(view.compile(&mut self.items, &self.ctx))
    }

    /// Make `view` active and ask LaunchBar to run the action again.
    pub fn show_view(&mut self, view: &str) -> Result<(), crate::script::ScriptError> {
        self.ctx.show_view(view)
    }

    /// The run handler of item `id` and its record merged with the input.
    fn redelivered(&self, id: i64) -> Option<(RunFn, ItemRecord)> {
        let item = self.item(id)?;
        let run = item.run_fn.clone()?;
        let mut record = item.record().clone();
        if let Some(input) = self.ctx.input.item() {
            record.arg.clone_from(&input.arg);
            record.order = input.order;
            record.func.clone_from(&input.func);
            record.func_arg.clone_from(&input.func_arg);
            record.data.clone_from(&input.data);
        }
        Some((run, record))
    }

    /// The active view joined with the wildcard view.
    fn render_view(&mut self, name: &str) -> String {
        let wildcard = self.views.get(WILDCARD_VIEW);
        let view = match (self.views.get(name), wildcard) {
            (Some(view), _) if name == WILDCARD_VIEW => view.clone(),
            (Some(view), wildcard) => view.join(wildcard),
            (None, Some(wildcard)) => {
                warn!(view = name, "view not registered, showing wildcard view");
                wildcard.clone()
            }
            (None, None) => {
                warn!(view = name, "view not registered");
                return error_items_json(&format!("Unknown view \"{name}\""));
            }
        };
        view.compile(&mut self.items, &self.ctx)
    }

    fn render_output(&mut self, result: HandlerResult) -> String {
        match result {
            Ok(Output::Text(text)) => text,
            Ok(Output::Items(items)) => items.compile(),
            Ok(Output::View(name)) => self.compile_view(&name).unwrap_or_else(|| {
                warn!(view = %name, "handler returned unknown view");
                error_items_json(&format!("Unknown view \"{name}\""))
            }),
            Err(e) => {
                error!(error = %e, "handler failed");
                error_items_json(&e.to_string())
            }
        }
    }
}

fn unknown_function(name: &str) -> String {
    warn!(func = name, "function not registered");
    error_items_json(&format!("Unknown function \"{name}\""))
}
