//! Items and item collections.
//!
//! An [`Item`] is an [`ItemRecord`] (what LaunchBar sees) plus the optional
//! process-local callbacks bound to it. Callbacks are never serialized.

use crate::context::Context;
use crate::handler::{HandlerResult, MatchFn, RenderFn, RunFn};
use lb_core::types::records_to_json;
use lb_core::ItemRecord;
use serde_json::Value;
use std::rc::Rc;

/// A displayable entry with optional callbacks.
#[derive(Clone, Default)]
pub struct Item {
    record: ItemRecord,
    pub(crate) match_fn: Option<MatchFn>,
    pub(crate) render_fn: Option<RenderFn>,
    pub(crate) run_fn: Option<RunFn>,
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("record", &self.record)
            .field("match_fn", &self.match_fn.is_some())
            .field("render_fn", &self.render_fn.is_some())
            .field("run_fn", &self.run_fn.is_some())
            .finish()
    }
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_record(ItemRecord::new(title))
    }

    pub fn from_record(record: ItemRecord) -> Self {
        Self {
            record,
            match_fn: None,
            render_fn: None,
            run_fn: None,
        }
    }

    /// Registration id; 0 until the item is attached to a view.
    pub fn id(&self) -> i64 {
        self.record.id
    }

    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut ItemRecord {
        &mut self.record
    }

    pub fn into_record(self) -> ItemRecord {
        self.record
    }

    pub fn has_run(&self) -> bool {
        self.run_fn.is_some()
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.record.id = id;
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.record.title = title.into();
        self
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) -> &mut Self {
        self.record.subtitle = subtitle.into();
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.record.url = url.into();
        self
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.record.path = path.into();
        self
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) -> &mut Self {
        self.record.icon = icon.into();
        self
    }

    pub fn set_quick_look_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.record.quick_look_url = url.into();
        self
    }

    /// Script LaunchBar runs when the item is activated.
    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.record.action = action.into();
        self
    }

    pub fn set_action_argument(&mut self, arg: impl Into<String>) -> &mut Self {
        self.record.action_argument = arg.into();
        self
    }

    pub fn set_action_bundle_identifier(&mut self, id: impl Into<String>) -> &mut Self {
        self.record.action_bundle_identifier = id.into();
        self
    }

    pub fn set_action_runs_in_background(&mut self, background: bool) -> &mut Self {
        self.record.action_runs_in_background = background;
        self
    }

    pub fn set_action_returns_items(&mut self, returns_items: bool) -> &mut Self {
        self.record.action_returns_items = returns_items;
        self
    }

    /// Nested items shown as a submenu. Children are serialized as-is:
    /// their callbacks are dropped and they are not matched or sorted.
    pub fn set_children(&mut self, children: Items) -> &mut Self {
        self.record.children = children.into_records();
        self
    }

    pub fn set_order(&mut self, order: i64) -> &mut Self {
        self.record.order = order;
        self
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.record.data.insert(key.into(), value.into());
        self
    }

    /// Bind a registered function, called when the item comes back as input.
    pub fn set_func<I, V>(&mut self, name: impl Into<String>, args: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.record.set_func(name, args);
        self
    }

    pub fn set_match<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Context, &ItemRecord) -> bool + 'static,
    {
        self.match_fn = Some(Rc::new(f));
        self
    }

    pub fn set_render<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Context, &mut ItemRecord) + 'static,
    {
        self.render_fn = Some(Rc::new(f));
        self
    }

    pub fn set_run<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Context, &ItemRecord) -> HandlerResult + 'static,
    {
        self.run_fn = Some(Rc::new(f));
        self
    }
}

/// An ordered collection of items.
#[derive(Debug, Clone, Default)]
pub struct Items(Vec<Item>);

impl Items {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap plain records, e.g. items read back from the cache.
    pub fn from_records(records: impl IntoIterator<Item = ItemRecord>) -> Self {
        records.into_iter().map(Item::from_record).collect()
    }

    pub fn push(&mut self, item: Item) -> &mut Self {
        self.0.push(item);
        self
    }

    /// Append a new item and return it for further setup.
    pub fn new_item(&mut self, title: impl Into<String>) -> &mut Item {
        self.0.push(Item::new(title));
        let last = self.0.len() - 1;
        &mut self.0[last]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &ItemRecord> {
        self.0.iter().map(Item::record)
    }

    pub fn into_records(self) -> Vec<ItemRecord> {
        self.0.into_iter().map(Item::into_record).collect()
    }

    /// JSON for LaunchBar, in insertion order.
    ///
    /// An empty collection yields `""`. No match, render or sort is applied.
    pub fn compile(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let records: Vec<&ItemRecord> = self.records().collect();
        records_to_json(&records)
    }

    /// A collection holding a single error item.
    pub fn error(message: impl Into<String>) -> Self {
        let mut items = Self::new();
        items.new_item(message).set_subtitle("error");
        items
    }
}

impl FromIterator<Item> for Items {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Item> for Items {
    fn extend<T: IntoIterator<Item = Item>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Items {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
