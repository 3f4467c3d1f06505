//! Wire types for the items LaunchBar renders.
//!
//! Field names match the JSON keys LaunchBar understands. Keys prefixed with
//! `x-` are private bookkeeping: LaunchBar ignores them but hands them back
//! unchanged when an emitted item is selected, which is how an action finds
//! the handler bound to that item on the next invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form data attached to an item (`x-data`).
pub type ItemData = BTreeMap<String, Value>;

/// One item as serialized for LaunchBar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(rename = "quickLookURL", skip_serializing_if = "String::is_empty")]
    pub quick_look_url: String,
    /// Name of the script LaunchBar runs when the item is activated.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(rename = "actionArgument", skip_serializing_if = "String::is_empty")]
    pub action_argument: String,
    #[serde(rename = "actionReturnsItems", skip_serializing_if = "is_false")]
    pub action_returns_items: bool,
    #[serde(rename = "actionRunsInBackground", skip_serializing_if = "is_false")]
    pub action_runs_in_background: bool,
    #[serde(
        rename = "actionBundleIdentifier",
        skip_serializing_if = "String::is_empty"
    )]
    pub action_bundle_identifier: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemRecord>,

    /// Registration id, 1-based. Zero means the item was never registered.
    #[serde(rename = "x-id")]
    pub id: i64,
    /// Explicit display order used when a view is compiled.
    #[serde(rename = "x-order")]
    pub order: i64,
    /// Name of the function to call when the item comes back as input.
    #[serde(rename = "x-func", skip_serializing_if = "String::is_empty")]
    pub func: String,
    /// Serialized argument for `func`.
    #[serde(rename = "x-funcarg", skip_serializing_if = "String::is_empty")]
    pub func_arg: String,
    /// The invocation string the item was emitted for.
    #[serde(rename = "x-arg")]
    pub arg: String,
    #[serde(rename = "x-data", skip_serializing_if = "BTreeMap::is_empty")]
    pub data: ItemData,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl ItemRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Bind a function call to this item.
    ///
    /// A single string argument is stored verbatim; anything else is stored
    /// as a JSON array.
    pub fn set_func<I, V>(&mut self, name: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.func = name.into();
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.func_arg = match args.as_slice() {
            [Value::String(s)] => s.clone(),
            [] => String::new(),
            _ => Value::Array(args).to_string(),
        };
    }

    /// Decode `func_arg` into a list of string arguments.
    ///
    /// A JSON array yields one entry per element (non-string elements are
    /// rendered as JSON); any other non-empty value is a single argument.
    pub fn func_args(&self) -> Vec<String> {
        if self.func_arg.is_empty() {
            return Vec::new();
        }
        match serde_json::from_str::<Vec<Value>>(&self.func_arg) {
            Ok(values) => values
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Err(_) => vec![self.func_arg.clone()],
        }
    }
}

/// JSON for a single synthetic error item.
///
/// Built from a `Value`, which always serializes, so this is safe to use as
/// the fallback when serializing real items failed.
pub fn error_items_json(message: &str) -> String {
    serde_json::json!([{ "title": message, "subtitle": "error" }]).to_string()
}

/// Serialize records into the JSON array LaunchBar expects.
///
/// Falls back to a single error item, so the result is always valid JSON.
pub fn records_to_json(records: &[&ItemRecord]) -> String {
    match serde_json::to_string(records) {
        Ok(json) => json,
        Err(e) => error_items_json(&e.to_string()),
    }
}
