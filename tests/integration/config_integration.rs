//! Integration tests for config layering as seen by the CLI run context

use super::test_utils::with_xdg_env;
use clap::Parser;
use tempfile::TempDir;
use winring::cli::{Cli, RunContext};
use winring::error::ApiError;

fn run(ctx: &RunContext, args: &[&str]) -> String {
    let mut argv = vec!["winring"];
    argv.extend_from_slice(args);
    ctx.execute(&Cli::try_parse_from(argv).unwrap().command).unwrap()
}

#[test]
fn test_global_config_selects_store() {
    let test_dir = TempDir::new().unwrap();
    let store_path = test_dir.path().join("custom-store");
    let config_dir = test_dir.path().join("winring");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[storage]\npath = {:?}\n\n[relocation]\nsettle_delay_ms = 5\n",
            store_path.to_str().unwrap()
        ),
    )
    .unwrap();

    with_xdg_env(&test_dir, || {
        {
            let ctx = RunContext::new(None, None).unwrap();
            assert_eq!(ctx.config().relocation.settle_delay_ms, 5);
            assert_eq!(ctx.config().storage.resolve_path(), store_path);
            run(&ctx, &["order", "set", "9", "4"]);
        }

        let ctx = RunContext::new(None, None).unwrap();
        assert_eq!(
            run(&ctx, &["order", "show"]),
            "Window order (2):\n  1. 9\n  2. 4"
        );
    });
    assert!(store_path.exists());
}

#[test]
fn test_default_store_under_data_home() {
    let test_dir = TempDir::new().unwrap();

    with_xdg_env(&test_dir, || {
        let ctx = RunContext::new(None, None).unwrap();
        let path = ctx.config().storage.resolve_path();
        assert!(path.starts_with(test_dir.path().join("data")));
        assert!(path.exists());
    });
}

#[test]
fn test_store_flag_overrides_config() {
    let test_dir = TempDir::new().unwrap();
    let override_path = test_dir.path().join("override");

    with_xdg_env(&test_dir, || {
        let ctx = RunContext::new(None, Some(override_path.clone())).unwrap();
        assert_eq!(ctx.config().storage.resolve_path(), override_path);
    });
}

#[test]
fn test_explicit_config_replaces_global_and_is_validated() {
    let test_dir = TempDir::new().unwrap();
    let explicit = test_dir.path().join("explicit.toml");
    std::fs::write(&explicit, "[relocation]\nsettle_delay_ms = 5000\n").unwrap();

    with_xdg_env(&test_dir, || {
        let result = RunContext::new(Some(explicit.clone()), Some(test_dir.path().join("s")));
        assert!(matches!(result, Err(ApiError::ConfigError(_))));
    });
}
