//! Integration tests for scenario replay, through the library and the CLI route

use std::sync::Arc;
use tempfile::TempDir;
use winring::cli::{Cli, RunContext};
use winring::config::WinringConfig;
use winring::scenario::{run_scenario, Scenario};
use winring::store::MemoryKeyValueStore;
use clap::Parser;

const TWO_WINDOWS: &str = r#"{
    "settle_delay_ms": 0,
    "steps": [
        { "open": { "name": "mail", "tabs": ["Inbox", "Thread"] } },
        { "open": { "name": "docs", "tabs": ["Guide"] } },
        { "open": { "kind": "devtools", "tabs": ["Inspector"] } },
        { "focus": { "window": "mail" } },
        { "activate": { "window": "mail", "tab": 1 } },
        { "command": { "command": "move-tabs-previous-window" } },
        { "label": { "window": "docs", "label": "Reading" } },
        { "command": { "command": "focus-previous-window" } }
    ]
}"#;

fn write_scenario(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("scenario.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[tokio::test]
async fn test_replay_from_file() {
    let dir = TempDir::new().unwrap();
    let scenario = Scenario::load(&write_scenario(&dir, TWO_WINDOWS)).unwrap();

    let report = run_scenario(&scenario).await.unwrap();

    assert_eq!(report.steps.len(), 8);
    assert_eq!(report.steps[2].order, vec![1, 2], "devtools window stays out");
    assert_eq!(report.steps[5].result, "moved 1 tab(s) 1 -> 2");
    assert_eq!(report.steps[7].result, "focused 1 (from 2)");
    assert_eq!(report.focused, Some(1));

    let titles: Vec<&str> = report.windows.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, vec!["Inbox", "Reading"]);
    assert_eq!(report.windows[1].derived_title, "Thread");
    assert_eq!(report.windows[1].tab_count, 2);
}

#[tokio::test]
async fn test_failed_command_is_recorded_not_fatal() {
    let json = r#"{
        "steps": [
            { "open": { "tabs": ["a"] } },
            { "command": { "command": "move-tabs-next-window" } },
            { "reorder": { "windows": [] } }
        ]
    }"#;
    let report = run_scenario(&Scenario::from_json(json).unwrap()).await.unwrap();

    assert_eq!(report.steps[1].result, "skipped: fewer than two windows");
    assert_eq!(report.steps[2].result, "ignored");
}

#[test]
fn test_simulate_through_cli_route() {
    let dir = TempDir::new().unwrap();
    let path = write_scenario(&dir, TWO_WINDOWS);
    let ctx = RunContext::with_backend(
        WinringConfig::default(),
        Arc::new(MemoryKeyValueStore::new()),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "winring",
        "simulate",
        path.to_str().unwrap(),
        "--format",
        "json",
    ])
    .unwrap();
    let output = ctx.execute(&cli.command).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["focused"], 1);
    assert_eq!(value["windows"][1]["title"], "Reading");

    // The replay wrote through to the context's store
    let cli = Cli::try_parse_from(["winring", "order", "show", "--format", "json"]).unwrap();
    let order: serde_json::Value = serde_json::from_str(&ctx.execute(&cli.command).unwrap()).unwrap();
    assert_eq!(order["order"], serde_json::json!([1, 2]));

    let cli = Cli::try_parse_from(["winring", "simulate", path.to_str().unwrap()]).unwrap();
    let text = ctx.execute(&cli.command).unwrap();
    assert!(text.contains("Reading (Thread)"));
}
