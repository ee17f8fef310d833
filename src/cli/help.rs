//! Command-name contract for logging.

use crate::cli::parse::{Commands, LabelCommands, OrderCommands};

/// Dotted command name (e.g. "order.show", "label.set").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Order { command } => format!("order.{}", order_command_name(command)),
        Commands::Label { command } => format!("label.{}", label_command_name(command)),
        Commands::Simulate { .. } => "simulate".to_string(),
    }
}

pub fn order_command_name(command: &OrderCommands) -> &'static str {
    match command {
        OrderCommands::Show { .. } => "show",
        OrderCommands::Set { .. } => "set",
        OrderCommands::Clear => "clear",
    }
}

pub fn label_command_name(command: &LabelCommands) -> &'static str {
    match command {
        LabelCommands::List { .. } => "list",
        LabelCommands::Set { .. } => "set",
        LabelCommands::Clear { .. } => "clear",
    }
}
