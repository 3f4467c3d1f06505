//! Decoding of the string LaunchBar passes to an action.
//!
//! The input is either what the user typed (or dropped) on the action, or a
//! previously emitted item that LaunchBar hands back as a JSON object when
//! the user selects it.

use crate::types::ItemRecord;
use serde_json::Value;

/// The decoded invocation input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    raw: String,
    item: Option<ItemRecord>,
    number: Option<f64>,
}

impl Input {
    /// Decode a raw invocation string.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let item = match serde_json::from_str::<Value>(&raw) {
            Ok(value @ Value::Object(_)) => serde_json::from_value::<ItemRecord>(value).ok(),
            _ => None,
        };
        let mut input = Self {
            raw,
            item,
            number: None,
        };
        input.number = input.as_str().trim().parse::<f64>().ok();
        input
    }

    /// Decode process arguments (without the program name), joined by spaces.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(parts.join(" "))
    }

    /// The string exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The effective input string: the item's `x-arg` for a re-delivered
    /// item, the raw string otherwise.
    pub fn as_str(&self) -> &str {
        match &self.item {
            Some(item) => &item.arg,
            None => &self.raw,
        }
    }

    /// The re-delivered item, if the input was an item object.
    pub fn item(&self) -> Option<&ItemRecord> {
        self.item.as_ref()
    }

    pub fn is_object(&self) -> bool {
        self.item.is_some()
    }

    pub fn is_string(&self) -> bool {
        self.item.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_number(&self) -> bool {
        self.number.is_some()
    }

    pub fn is_int(&self) -> bool {
        self.number.is_some_and(|n| n.is_finite() && n.fract() == 0.0)
    }

    pub fn is_float(&self) -> bool {
        self.is_number() && !self.is_int()
    }

    /// Numeric value of the input, or 0.
    pub fn as_f64(&self) -> f64 {
        self.number.unwrap_or(0.0)
    }

    /// Integer value of the input (truncated), or 0.
    pub fn as_i64(&self) -> i64 {
        self.as_f64() as i64
    }

    /// `x-id` of the re-delivered item.
    pub fn item_id(&self) -> Option<i64> {
        self.item.as_ref().map(|item| item.id)
    }

    /// Title of the re-delivered item, or `""`.
    pub fn title(&self) -> &str {
        self.item.as_ref().map_or("", |item| item.title.as_str())
    }

    /// Name of the bound function, if the item carries one.
    pub fn func_name(&self) -> Option<&str> {
        self.item
            .as_ref()
            .map(|item| item.func.as_str())
            .filter(|name| !name.is_empty())
    }

    /// The serialized function argument, or `""`.
    pub fn func_arg(&self) -> &str {
        self.item.as_ref().map_or("", |item| item.func_arg.as_str())
    }

    /// The function arguments as strings.
    pub fn func_args(&self) -> Vec<String> {
        self.item
            .as_ref()
            .map(ItemRecord::func_args)
            .unwrap_or_default()
    }

    pub fn has_data(&self) -> bool {
        self.item.as_ref().is_some_and(|item| !item.data.is_empty())
    }

    /// A value from the item's `x-data`.
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.item.as_ref().and_then(|item| item.data.get(key))
    }

    /// A string from the item's `x-data`, or `""`.
    pub fn data_str(&self, key: &str) -> &str {
        self.data(key).and_then(Value::as_str).unwrap_or("")
    }

    /// An integer from the item's `x-data`, or 0.
    pub fn data_i64(&self, key: &str) -> i64 {
        self.data(key).and_then(Value::as_i64).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_input() {
        let input = Input::parse("hello world");

        assert!(input.is_string());
        assert!(!input.is_object());
        assert!(!input.is_number());
        assert_eq!(input.as_str(), "hello world");
        assert_eq!(input.title(), "");
        assert!(input.func_name().is_none());
        assert!(input.func_args().is_empty());
    }

    #[test]
    fn args_are_joined_with_spaces() {
        let input = Input::from_args(["open", "my", "file"]);
        assert_eq!(input.raw(), "open my file");
    }

    #[test]
    fn empty_input() {
        let input = Input::from_args(Vec::<String>::new());
        assert!(input.is_empty());
        assert!(input.is_string());
    }

    #[test]
    fn integer_and_float_detection() {
        let int = Input::parse("42");
        assert!(int.is_number());
        assert!(int.is_int());
        assert!(!int.is_float());
        assert_eq!(int.as_i64(), 42);

        let float = Input::parse("3.25");
        assert!(float.is_float());
        assert!(!float.is_int());
        assert!((float.as_f64() - 3.25).abs() < f64::EPSILON);
    }

    #[test]
    fn numbers_are_not_objects() {
        // Valid JSON, but not an item.
        let input = Input::parse("7");
        assert!(input.is_string());
        assert!(input.is_int());
    }

    #[test]
    fn json_array_is_a_string_input() {
        let input = Input::parse(r#"["a","b"]"#);
        assert!(input.is_string());
        assert_eq!(input.as_str(), r#"["a","b"]"#);
    }

    #[test]
    fn item_object_input() {
        let raw = r#"{"title":"Recent","x-id":2,"x-order":1,"x-arg":"12","x-data":{"tag":"rust","page":3}}"#;
        let input = Input::parse(raw);

        assert!(input.is_object());
        assert_eq!(input.item_id(), Some(2));
        assert_eq!(input.title(), "Recent");
        // The effective string is the stamped argument, not the JSON.
        assert_eq!(input.as_str(), "12");
        assert!(input.is_int());
        assert!(input.has_data());
        assert_eq!(input.data_str("tag"), "rust");
        assert_eq!(input.data_i64("page"), 3);
        assert_eq!(input.data_str("missing"), "");
    }

    #[test]
    fn function_call_input() {
        let raw = r#"{"title":"Go","x-func":"open","x-funcarg":"[\"a\",\"b\"]","x-arg":""}"#;
        let input = Input::parse(raw);

        assert_eq!(input.func_name(), Some("open"));
        assert_eq!(input.func_arg(), r#"["a","b"]"#);
        assert_eq!(input.func_args(), vec!["a".to_string(), "b".to_string()]);
        assert!(input.is_empty());
    }

    #[test]
    fn non_array_func_arg_is_single_argument() {
        let raw = r#"{"x-func":"open","x-funcarg":"https://example.com"}"#;
        let input = Input::parse(raw);

        assert_eq!(input.func_args(), vec!["https://example.com".to_string()]);
    }
}
