//! winring CLI Binary
//!
//! Command-line interface for inspecting and editing the persisted window ring.

use clap::Parser;
use std::process;
use tracing::{error, info};
use winring::cli::{Cli, RunContext};
use winring::config::ConfigLoader;
use winring::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("winring CLI starting");

    let context = match RunContext::new(cli.config.clone(), cli.store.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error opening ordering store: {}", e);
            eprintln!("{}", winring::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", winring::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
        if cli.log_output.is_none() {
            config.output = "file".to_string();
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_logging_config_default() {
        let cli = Cli::try_parse_from(["winring", "order", "show"]).unwrap();
        let config = build_logging_config(&cli);
        assert!(config.enabled, "default should have logging enabled");
        assert_eq!(config.output, "stderr", "default output should be stderr");
    }

    #[test]
    fn test_build_logging_config_quiet() {
        let cli = Cli::try_parse_from(["winring", "--quiet", "order", "show"]).unwrap();
        let config = build_logging_config(&cli);
        assert!(!config.enabled, "quiet should disable logging");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["winring", "--quiet", "--verbose", "order", "show"]).is_err());
    }

    #[test]
    fn test_build_logging_config_verbose() {
        let cli = Cli::try_parse_from(["winring", "--verbose", "order", "show"]).unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.level, "debug", "verbose should set level to debug");
    }

    #[test]
    fn test_explicit_level_wins_over_verbose() {
        let cli = Cli::try_parse_from([
            "winring",
            "--verbose",
            "--log-level",
            "trace",
            "order",
            "show",
        ])
        .unwrap();
        assert_eq!(build_logging_config(&cli).level, "trace");
    }

    #[test]
    fn test_log_file_implies_file_output() {
        let cli = Cli::try_parse_from([
            "winring",
            "--log-file",
            "/tmp/winring-test.log",
            "label",
            "list",
        ])
        .unwrap();
        let config = build_logging_config(&cli);
        assert_eq!(config.output, "file");
        assert_eq!(config.file, std::path::PathBuf::from("/tmp/winring-test.log"));
    }
}
