//! End-to-end runs of the shell and one-shot commands against the backends
//! the binary registers.

use std::io::Cursor;
use std::path::Path;

use clap::Parser;
use pretty_assertions::assert_eq;
use renta_cli::app::{RentaApp, build_registry};
use renta_cli::cli::{self, Cli};
use renta_cli::config::RentaConfig;
use renta_cli::shell::run_shell;
use renta_core::storage::{RESULTS_KEY, StoreConfig};
use renta_core::{KeyValueStore, SalaryRecord};

async fn sqlite_app() -> RentaApp<Box<dyn KeyValueStore>> {
    let store = build_registry()
        .create(&StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        })
        .await
        .expect("in-memory sqlite should open");
    let mut app = RentaApp::new(store);
    app.load().await;
    app
}

async fn session(
    app: &mut RentaApp<Box<dyn KeyValueStore>>,
    script: &str,
) -> String {
    let mut out = Vec::new();
    run_shell(app, Cursor::new(script.to_string()), &mut out)
        .await
        .expect("shell should run");
    String::from_utf8(out).expect("output is utf-8")
}

async fn persisted(app: &RentaApp<Box<dyn KeyValueStore>>) -> Vec<SalaryRecord> {
    let raw = app
        .store()
        .get_item(RESULTS_KEY)
        .await
        .expect("read should succeed")
        .expect("results key should exist");
    serde_json::from_str(&raw).expect("payload should parse")
}

#[tokio::test]
async fn calc_before_filling_asks_for_fields() {
    let mut app = sqlite_app().await;

    let out = session(&mut app, "first Ana\ncalc\nquit\n").await;

    assert!(out.contains("Please complete the fields and press Calculate"));
    assert!(out.contains("Last name, Salary missing"));
    assert!(app.state().result.is_none());
}

#[tokio::test]
async fn shell_never_overwrites_unreadable_results() {
    let mut app = sqlite_app().await;
    let truncated = r#"[{"id":"old","firstName":"Old","#;
    app.store()
        .set_item(RESULTS_KEY, truncated)
        .await
        .expect("seed write should succeed");

    let out = session(
        &mut app,
        "reload
first Ana
last Pérez
salary 800
calc
save
delete old
quit
",
    )
    .await;

    assert!(out.contains("Saved results could not be loaded"));
    assert!(out.contains("The result was not saved"));
    assert!(out.contains("The result was not deleted"));
    let raw = app.store().get_item(RESULTS_KEY).await.unwrap();
    assert_eq!(raw.as_deref(), Some(truncated));
}

#[tokio::test]
async fn save_list_and_delete_through_shell() {
    let mut app = sqlite_app().await;

    let out = session(
        &mut app,
        "first Ana\nlast Pérez\nsalary 3000\ncalc\nsave\n\
         first Luis\nlast Gómez\nsalary 800\ncalc\nsave\nlist\n",
    )
    .await;
    assert!(out.contains("Net:         $2250.00"));
    assert!(out.contains("Net:         $744.00"));
    assert_eq!(out.matches("Result saved successfully.").count(), 2);

    let stored = persisted(&app).await;
    assert_eq!(stored, app.state().records);
    assert_eq!(stored.len(), 2);

    let first_id = stored[0].id.to_string();
    let out = session(&mut app, &format!("delete {}\nlist\n", &first_id[..8])).await;
    assert!(out.contains("Result deleted successfully."));
    assert!(!out.contains("Ana Pérez"));
    assert!(out.contains("Luis Gómez"));

    let stored = persisted(&app).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].full_name(), "Luis Gómez");
}

#[tokio::test]
async fn editing_after_calc_requires_recalculation() {
    let mut app = sqlite_app().await;

    let out = session(
        &mut app,
        "first Ana\nlast Pérez\nsalary 3000\ncalc\nsalary 1500\nsave\n",
    )
    .await;

    assert!(out.contains("Press Calculate before saving."));
    assert!(app.state().records.is_empty());
}

#[tokio::test]
async fn unknown_commands_do_not_end_the_session() {
    let mut app = sqlite_app().await;

    let out = session(&mut app, "dance\nhelp\n").await;

    assert!(out.contains("unknown command 'dance'"));
    assert!(out.contains("calculate the renta for the form"));
}

#[tokio::test]
async fn one_shot_save_is_visible_to_next_load() {
    let mut app = sqlite_app().await;
    let cli = Cli::try_parse_from([
        "renta",
        "save",
        "--first-name",
        "Eva",
        "--last-name",
        "Soto",
        "--salary",
        "1000",
    ])
    .expect("arguments should parse");

    let mut out = Vec::new();
    let ok = cli::run(&mut app, cli.command, &mut out).await.expect("save should run");
    assert!(ok);

    app.load().await;
    let names: Vec<String> = app.state().records.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["Eva Soto"]);
    assert_eq!(app.state().records[0].tax_bracket.label(), "18%");
}

#[test]
fn fixture_config_overrides_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("renta.toml");

    let config = RentaConfig::load(&path).expect("fixture config should load");

    assert_eq!(config.store.backend, "memory");
    assert_eq!(config.store.connection_string, "renta.db");
    assert_eq!(config.logging.level, "debug");
}
