//! CLI parse: clap types for winring. No behavior; definitions only.

use crate::types::WindowId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// winring CLI - inspect and edit the persisted window ring
#[derive(Parser)]
#[command(name = "winring")]
#[command(about = "User-defined circular window ordering")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Ordering store directory (overrides the configured path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Configuration file path (replaces the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or edit the persisted window order
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Manage window label overrides
    Label {
        #[command(subcommand)]
        command: LabelCommands,
    },
    /// Replay a JSON scenario against the simulated browser
    Simulate {
        /// Scenario file
        script: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Print the persisted order
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Replace the persisted order; repeated ids keep their first position
    Set {
        #[arg(required = true)]
        ids: Vec<WindowId>,
    },
    /// Reset the order; the next reconciliation reseeds it from live windows
    Clear,
}

#[derive(Subcommand)]
pub enum LabelCommands {
    /// List label overrides
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set a label; blank labels or labels equal to the derived title remove it
    Set {
        id: WindowId,
        label: String,
        /// The window's current derived title
        #[arg(long, default_value = "")]
        derived: String,
    },
    /// Remove a label
    Clear { id: WindowId },
}
