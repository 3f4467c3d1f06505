//! Callback signatures and handler results.
//!
//! Callbacks receive the shared [`Context`] explicitly. Match predicates and
//! render hooks run while a view is compiled; run handlers and registered
//! functions run when LaunchBar hands an emitted item back to the action.

use crate::context::Context;
use crate::item::Items;
use lb_core::ItemRecord;
use std::rc::Rc;

/// Error type returned by user callbacks.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<Output, HandlerError>;

/// Visibility predicate evaluated at compile time.
pub type MatchFn = Rc<dyn Fn(&Context, &ItemRecord) -> bool>;

/// Late-binding mutator evaluated at compile time, before serialization.
pub type RenderFn = Rc<dyn Fn(&Context, &mut ItemRecord)>;

/// Item run handler or registered function.
pub type RunFn = Rc<dyn Fn(&mut Context, &ItemRecord) -> HandlerResult>;

/// What a handler hands back to LaunchBar.
#[derive(Debug)]
pub enum Output {
    /// Printed verbatim.
    Text(String),
    /// Serialized in insertion order.
    Items(Items),
    /// Name of a registered view to compile.
    View(String),
}

impl Output {
    /// No output; LaunchBar keeps its current state.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self::View(name.into())
    }
}

impl From<String> for Output {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Output {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Items> for Output {
    fn from(items: Items) -> Self {
        Self::Items(items)
    }
}

/// Predicate that always shows the item.
pub fn always() -> impl Fn(&Context, &ItemRecord) -> bool {
    |_, _| true
}

/// Predicate that never shows the item.
pub fn never() -> impl Fn(&Context, &ItemRecord) -> bool {
    |_, _| false
}

/// Show the item when `condition` holds (evaluated at registration time).
pub fn match_if(condition: bool) -> impl Fn(&Context, &ItemRecord) -> bool {
    move |_, _| condition
}

/// Show the item unless `condition` holds.
pub fn match_unless(condition: bool) -> impl Fn(&Context, &ItemRecord) -> bool {
    move |_, _| !condition
}

/// Run handler that switches to `view` and re-runs the action.
pub fn show_view(view: impl Into<String>) -> impl Fn(&mut Context, &ItemRecord) -> HandlerResult {
    let view = view.into();
    move |ctx, _| {
        ctx.show_view(&view)?;
        Ok(Output::empty())
    }
}
