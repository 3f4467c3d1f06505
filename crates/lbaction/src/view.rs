//! Named screens of items and their compilation to LaunchBar JSON.
//!
//! Items live in one flat registry owned by the [`Action`](crate::Action);
//! a [`View`] only holds positions into that registry, so the same item can
//! appear in a joined view without being copied.

use crate::context::Context;
use crate::handler::always;
use crate::item::Item;
use lb_core::types::records_to_json;
use lb_core::{Config, ItemRecord};

/// Config key holding the active view name.
pub const VIEW_CONFIG_KEY: &str = "view";

/// View rendered when no view is selected.
pub const DEFAULT_VIEW: &str = "main";

/// View appended to every rendered view.
pub const WILDCARD_VIEW: &str = "*";

/// Config key holding the script assigned to new items.
pub const DEFAULT_SCRIPT_KEY: &str = "actionDefaultScript";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub(crate) items: Vec<usize>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A new view with this view's name and both views' items.
    pub fn join(&self, other: Option<&View>) -> View {
        let mut joined = self.clone();
        if let Some(other) = other {
            joined.items.extend_from_slice(&other.items);
        }
        joined
    }

    /// Match, render, stamp the input argument, sort by order and serialize.
    ///
    /// Returns `""` for a view without items and `"[]"` when every item was
    /// filtered out.
    pub fn compile(&self, registry: &mut [Item], ctx: &Context) -> String {
        if self.items.is_empty() {
            return String::new();
        }

        let arg = ctx.input.as_str();
        let mut shown: Vec<usize> = Vec::with_capacity(self.items.len());
        for &index in &self.items {
            let Some(item) = registry.get_mut(index) else {
                continue;
            };
            if let Some(matches) = &item.match_fn {
                if !matches(ctx, item.record()) {
                    continue;
                }
            }
            if let Some(render) = item.render_fn.clone() {
                render(ctx, item.record_mut());
            }
            item.record_mut().arg = arg.to_string();
            shown.push(index);
        }

        let mut records: Vec<&ItemRecord> = shown.iter().map(|&i| registry[i].record()).collect();
        records.sort_by_key(|record| record.order);
        records_to_json(&records)
    }
}

/// Registration handle for one view.
///
/// Borrowed from [`Action::view`](crate::Action::view); items added here are
/// appended to both the view and the action's registry.
#[derive(Debug)]
pub struct ViewMut<'a> {
    pub(crate) view: &'a mut View,
    pub(crate) registry: &'a mut Vec<Item>,
    pub(crate) config: &'a Config,
}

impl ViewMut<'_> {
    pub fn name(&self) -> &str {
        &self.view.name
    }

    /// Create an item with the default settings and register it.
    ///
    /// The item runs in the background, uses the configured default script,
    /// always matches and is ordered after the items already in the view.
    pub fn new_item(&mut self, title: impl Into<String>) -> &mut Item {
        let mut item = Item::new(title);
        item.set_action_runs_in_background(true)
            .set_action(self.config.get_str(DEFAULT_SCRIPT_KEY))
            .set_match(always())
            .set_order(self.view.items.len() as i64);
        let index = self.register(item);
        &mut self.registry[index]
    }

    /// Register an existing item; returns its id.
    pub fn add_item(&mut self, mut item: Item) -> i64 {
        if item.match_fn.is_none() {
            item.set_match(always());
        }
        let index = self.register(item);
        self.registry[index].id()
    }

    fn register(&mut self, mut item: Item) -> usize {
        let index = self.registry.len();
        item.set_id(index as i64 + 1);
        self.registry.push(item);
        self.view.items.push(index);
        index
    }
}
