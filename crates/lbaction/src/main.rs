//! lbaction-demo - a sample LaunchBar action.
//!
//! Shows a main view and a settings view, a wildcard item present on both,
//! and a named function. Run it with `LB_SUPPORT_PATH` and `LB_CACHE_PATH`
//! pointing at writable directories; without them the current directory is
//! used.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use chrono::Duration;
use clap::Parser;
use lbaction::{show_view, Action, ConfigValues, Context, Env, ItemRecord, Items, Output};
use serde_json::json;
use tracing::error;

#[derive(Parser)]
#[command(name = "lbaction-demo", about = "Sample LaunchBar action", version)]
struct Cli {
    /// Input LaunchBar passes to the action (words are joined by spaces)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,
}

const RECENT_KEY: &str = "recent";

fn main() {
    let cli = Cli::parse();
    let env = Env::from_env();
    lbaction::logging::init(&env);

    let mut defaults = ConfigValues::new();
    defaults.insert("greeting".into(), json!("Hello"));
    defaults.insert("limit".into(), json!(5));

    let mut action = match Action::new("Demo", env, defaults) {
        Ok(action) => action,
        Err(e) => {
            error!("failed to start action: {}", e);
            std::process::exit(1);
        }
    };
    action.init(&cli.input);
    action.register_func("greet", greet);

    build_main(&mut action);
    build_settings(&mut action);

    let mut wildcard = action.new_view("*");
    wildcard
        .new_item("Check for updates")
        .set_func("update", Vec::<String>::new())
        .set_order(100);

    println!("{}", action.run());
}

fn build_main(action: &mut Action) {
    let mut main = action.new_view("main");
    main.new_item("Greet")
        .set_subtitle("Say hello to the input")
        .set_func("greet", ["world"])
        .set_render(|ctx, record| {
            if !ctx.input.is_empty() {
                record.subtitle = format!("Say hello to {}", ctx.input.as_str());
            }
        });
    main.new_item("Recent inputs")
        .set_action_returns_items(true)
        .set_run(|ctx, _| {
            let recent = ctx.cache.get_items(RECENT_KEY).unwrap_or_default();
            if recent.is_empty() {
                return Ok(Output::from(Items::error("Nothing yet")));
            }
            Ok(Output::from(Items::from_records(recent)))
        });
    main.new_item("Remember input")
        .set_match(|ctx, _| !ctx.input.is_empty())
        .set_run(|ctx, record| {
            let limit = usize::try_from(ctx.config.get_i64("limit")).unwrap_or(5);
            let mut recent = ctx.cache.get_items(RECENT_KEY).unwrap_or_default();
            recent.insert(0, ItemRecord::new(record.arg.clone()));
            recent.truncate(limit);
            ctx.cache.set_items(RECENT_KEY, &recent, Duration::days(7))?;
            Ok(Output::view("main"))
        });
    main.new_item("Settings")
        .set_icon("at.obdev.LaunchBar:GearTemplate")
        .set_run(show_view("settings"));
}

fn build_settings(action: &mut Action) {
    let mut settings = action.new_view("settings");
    settings
        .new_item("Greeting")
        .set_render(|ctx, record| record.subtitle = ctx.config.get_str("greeting").to_string())
        .set_run(|ctx, record| {
            if !record.arg.is_empty() {
                ctx.config.set("greeting", record.arg.clone())?;
            }
            Ok(Output::empty())
        });
    settings.new_item("Back").set_run(show_view("main"));
}

fn greet(ctx: &mut Context, record: &ItemRecord) -> lbaction::HandlerResult {
    let who = record.func_args().into_iter().next().unwrap_or_default();
    let who = if ctx.input.is_empty() {
        who
    } else {
        ctx.input.as_str().to_string()
    };
    let mut items = Items::new();
    items
        .new_item(format!("{} {}", ctx.config.get_str("greeting"), who))
        .set_subtitle(ctx.version().to_string());
    Ok(items.into())
}
