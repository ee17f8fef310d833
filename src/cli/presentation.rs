//! CLI presentation: text and json formatters per command family.

use crate::error::ApiError;
use crate::labels::label_for;
use crate::scenario::ScenarioReport;
use crate::types::{LabelOverrides, WindowId};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;
use serde_json::json;

fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::OutputError)
}

fn format_ids(ids: &[WindowId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_order_text(order: Option<&[WindowId]>, labels: &LabelOverrides) -> String {
    let order = match order {
        Some(order) if !order.is_empty() => order,
        _ => return "No window order persisted.".to_string(),
    };
    let mut lines = vec![format!("Window order ({}):", order.len())];
    for (i, id) in order.iter().enumerate() {
        match label_for(labels, *id) {
            Some(label) => lines.push(format!("  {}. {}  [{}]", i + 1, id, label)),
            None => lines.push(format!("  {}. {}", i + 1, id)),
        }
    }
    lines.join("\n")
}

pub fn format_order_json(order: Option<&[WindowId]>) -> Result<String, ApiError> {
    to_json_pretty(&json!({ "order": order.unwrap_or_default() }))
}

pub fn format_labels_text(labels: &LabelOverrides) -> String {
    if labels.is_empty() {
        return "No window labels.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Window", "Label"]);
    for (id, label) in labels {
        table.add_row(vec![id.clone(), label.clone()]);
    }
    table.to_string()
}

pub fn format_labels_json(labels: &LabelOverrides) -> Result<String, ApiError> {
    to_json_pretty(&json!({ "labels": labels }))
}

pub fn format_scenario_report_text(report: &ScenarioReport) -> String {
    let mut out = String::new();

    let mut steps = Table::new();
    steps.load_preset(UTF8_BORDERS_ONLY);
    steps.set_header(vec!["#", "Action", "Result", "Order"]);
    for step in &report.steps {
        steps.add_row(vec![
            (step.index + 1).to_string(),
            step.action.clone(),
            step.result.clone(),
            format_ids(&step.order),
        ]);
    }
    out.push_str(&format!("Steps\n\n{}\n\n", steps));

    if report.windows.is_empty() {
        out.push_str("No windows open.");
        return out;
    }
    let mut windows = Table::new();
    windows.load_preset(UTF8_BORDERS_ONLY);
    windows.set_header(vec!["Window", "Title", "Tabs", "Focused"]);
    for window in &report.windows {
        let title = if window.custom {
            format!("{} ({})", window.title, window.derived_title)
        } else {
            window.title.clone()
        };
        windows.add_row(vec![
            window.id.to_string(),
            title,
            window.tab_count.to_string(),
            if window.active { "*" } else { "" }.to_string(),
        ]);
    }
    out.push_str(&format!("Windows\n\n{}", windows));
    out
}

pub fn format_scenario_report_json(report: &ScenarioReport) -> Result<String, ApiError> {
    to_json_pretty(report)
}
