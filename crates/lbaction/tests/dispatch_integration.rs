//! Integration tests for whole invocations.
//!
//! Each test registers views and handlers, feeds one input the way
//! LaunchBar would, and inspects the JSON the action prints.

use lbaction::env::{CACHE_PATH, SUPPORT_PATH};
use lbaction::view::{VIEW_CONFIG_KEY, WILDCARD_VIEW};
use lbaction::{Action, ConfigValues, Dispatch, Env, Input, Item, Items, Output};
use serde_json::{json, Value};
use std::cell::Cell;
use std::rc::Rc;
use tempfile::TempDir;

fn create_test_action() -> (Action, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_string_lossy().into_owned();
    let env = Env::from_vars([(SUPPORT_PATH, path.clone()), (CACHE_PATH, path)]);
    let action = Action::new("Test", env, ConfigValues::new()).unwrap();
    (action, dir)
}

fn parse(output: &str) -> Vec<Value> {
    serde_json::from_str(output).unwrap()
}

fn titles(output: &str) -> Vec<String> {
    parse(output)
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect()
}

/// The JSON LaunchBar sends back when the user picks an emitted item.
fn redeliver(output: &str, title: &str) -> Input {
    let item = parse(output)
        .into_iter()
        .find(|item| item["title"] == title)
        .unwrap();
    Input::parse(item.to_string())
}

// --- View rendering ---

#[test]
fn default_view_includes_wildcard_sorted_by_order() {
    let (mut action, _dir) = create_test_action();
    action.new_view(WILDCARD_VIEW).new_item("Help").set_order(-1);
    {
        let mut main = action.new_view("main");
        main.new_item("First");
        main.new_item("Second");
    }

    let output = action.run();
    assert_eq!(titles(&output), vec!["Help", "First", "Second"]);
}

#[test]
fn example_order_two_then_one_renders_reversed() {
    let (mut action, _dir) = create_test_action();
    {
        let mut main = action.new_view("main");
        main.new_item("A").set_order(2);
        main.new_item("B").set_order(1);
    }

    assert_eq!(titles(&action.run()), vec!["B", "A"]);
}

#[test]
fn equal_orders_keep_registration_order() {
    let (mut action, _dir) = create_test_action();
    {
        let mut main = action.new_view("main");
        for title in ["x", "y", "z"] {
            main.new_item(title).set_order(0);
        }
    }

    assert_eq!(titles(&action.run()), vec!["x", "y", "z"]);
}

#[test]
fn configured_view_is_rendered() {
    let (mut action, _dir) = create_test_action();
    action.new_view("main").new_item("Main item");
    action.new_view("settings").new_item("Settings item");
    action
        .context_mut()
        .config
        .set(VIEW_CONFIG_KEY, "settings")
        .unwrap();

    assert_eq!(titles(&action.run()), vec!["Settings item"]);
}

#[test]
fn input_is_stamped_on_every_item() {
    let (mut action, _dir) = create_test_action();
    {
        let mut main = action.new_view("main");
        main.new_item("one");
        main.new_item("two");
    }
    action.init(["some", "query"]);

    for item in parse(&action.run()) {
        assert_eq!(item["x-arg"], "some query");
    }
}

#[test]
fn filtered_item_is_never_rendered() {
    let (mut action, _dir) = create_test_action();
    let rendered = Rc::new(Cell::new(false));
    {
        let flag = Rc::clone(&rendered);
        let mut main = action.new_view("main");
        main.new_item("visible");
        main.new_item("hidden")
            .set_match(|ctx, _| ctx.input.is_number())
            .set_render(move |_, _| flag.set(true));
    }
    action.init(["text"]);

    assert_eq!(titles(&action.run()), vec!["visible"]);
    assert!(!rendered.get());
}

#[test]
fn missing_view_falls_back_to_wildcard() {
    let (mut action, _dir) = create_test_action();
    action.new_view(WILDCARD_VIEW).new_item("Always");

    assert_eq!(action.dispatch(), Dispatch::View("main".into()));
    assert_eq!(titles(&action.run()), vec!["Always"]);
}

#[test]
fn missing_view_without_wildcard_reports_error() {
    let (mut action, _dir) = create_test_action();

    let items = parse(&action.run());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Unknown view \"main\"");
    assert_eq!(items[0]["subtitle"], "error");
}

#[test]
fn empty_view_renders_nothing() {
    let (mut action, _dir) = create_test_action();
    action.new_view("main");

    assert_eq!(action.run(), "");
}

// --- Item identity ---

#[test]
fn ids_are_sequential_across_views() {
    let (mut action, _dir) = create_test_action();
    let first = action.new_view("main").new_item("a").id();
    let second = action.new_view("other").new_item("b").id();
    let third = action
        .view("main")
        .unwrap()
        .add_item(Item::new("c"));

    assert_eq!((first, second, third), (1, 2, 3));
    assert_eq!(action.item(3).unwrap().record().title, "c");
    assert!(action.item(0).is_none());
    assert!(action.item(-1).is_none());
    assert!(action.item(4).is_none());
}

// --- Item handlers ---

#[test]
fn redelivered_item_runs_its_handler() {
    let (mut action, dir) = create_test_action();
    action
        .new_view("main")
        .new_item("Echo")
        .set_data("prefix", "got")
        .set_run(|_, record| {
            let prefix = record.data["prefix"].as_str().unwrap_or_default();
            Ok(Output::from(format!("{prefix} {}", record.arg)))
        });
    action.init(["hello"]);
    let first = action.run();

    // Next invocation: LaunchBar hands the item back.
    let path = dir.path().to_string_lossy().into_owned();
    let env = Env::from_vars([(SUPPORT_PATH, path.clone()), (CACHE_PATH, path)]);
    let mut next = Action::new("Test", env, ConfigValues::new()).unwrap();
    next.new_view("main")
        .new_item("Echo")
        .set_data("prefix", "got")
        .set_run(|_, record| {
            let prefix = record.data["prefix"].as_str().unwrap_or_default();
            Ok(Output::from(format!("{prefix} {}", record.arg)))
        });
    next.set_input(redeliver(&first, "Echo"));

    assert_eq!(next.dispatch(), Dispatch::ItemHandler(1));
    assert_eq!(next.run(), "got hello");
}

#[test]
fn handler_items_are_serialized_in_insertion_order() {
    let (mut action, _dir) = create_test_action();
    action.new_view("main").new_item("List").set_run(|_, _| {
        let mut items = Items::new();
        items.new_item("z").set_order(1);
        items.new_item("a").set_order(0);
        Ok(items.into())
    });
    action.set_input(Input::parse(r#"{"title":"List","x-id":1,"x-arg":""}"#));

    assert_eq!(titles(&action.run()), vec!["z", "a"]);
}

#[test]
fn handler_can_switch_to_view() {
    let (mut action, _dir) = create_test_action();
    action
        .new_view("main")
        .new_item("More")
        .set_run(|_, _| Ok(Output::view("more")));
    action.new_view("more").new_item("Extra");
    action.set_input(Input::parse(r#"{"title":"More","x-id":1,"x-arg":"q"}"#));

    let items = parse(&action.run());
    assert_eq!(items[0]["title"], "Extra");
    assert_eq!(items[0]["x-arg"], "q");
}

#[test]
fn handler_error_becomes_error_item() {
    let (mut action, _dir) = create_test_action();
    action
        .new_view("main")
        .new_item("Broken")
        .set_run(|_, _| Err("disk on fire".into()));
    action.set_input(Input::parse(r#"{"title":"Broken","x-id":1}"#));

    let items = parse(&action.run());
    assert_eq!(items, vec![json!({"title": "disk on fire", "subtitle": "error"})]);
}

// --- Functions ---

#[test]
fn bound_function_receives_arguments() {
    let (mut action, _dir) = create_test_action();
    action.register_func("open", |_, record| {
        Ok(Output::from(record.func_args().join("+")))
    });
    action
        .new_view("main")
        .new_item("Open both")
        .set_func("open", ["a", "b"]);
    let first = action.run();

    action.set_input(redeliver(&first, "Open both"));
    assert_eq!(action.dispatch(), Dispatch::Function("open".into()));
    assert_eq!(action.run(), "a+b");
}

#[test]
fn function_wins_over_item_handler() {
    let (mut action, _dir) = create_test_action();
    action.register_func("f", |_, _| Ok("from function".into()));
    action
        .new_view("main")
        .new_item("Both")
        .set_func("f", ["x"])
        .set_run(|_, _| Ok("from handler".into()));
    let first = action.run();

    action.set_input(redeliver(&first, "Both"));
    assert_eq!(action.run(), "from function");
}

#[test]
fn unknown_function_is_reported() {
    let (mut action, _dir) = create_test_action();
    action.new_view("main").new_item("Fallback");
    action.set_input(Input::parse(r#"{"title":"Gone","x-func":"missing"}"#));

    assert_eq!(action.dispatch(), Dispatch::UnknownFunction("missing".into()));
    let items = parse(&action.run());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Unknown function \"missing\"");
}

#[test]
fn functions_can_update_config() {
    let (mut action, dir) = create_test_action();
    action.register_func("remember", |ctx, record| {
        ctx.config.set("last", record.func_arg.clone())?;
        Ok(Output::empty())
    });
    action.set_input(Input::parse(
        r#"{"title":"Save","x-func":"remember","x-funcarg":"value"}"#,
    ));

    assert_eq!(action.run(), "");
    let saved: Value = serde_json::from_slice(
        &std::fs::read(dir.path().join(lb_core::config::CONFIG_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(saved["last"], "value");
}
