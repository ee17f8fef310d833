//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, LabelCommands, OrderCommands};
pub use presentation::{
    format_labels_json, format_labels_text, format_order_json, format_order_text,
    format_scenario_report_json, format_scenario_report_text,
};
pub use route::RunContext;
