//! Window labels and the ordered window listing.
//!
//! A window's derived title comes from its tabs; a user label overrides it.
//! Labels that are blank or equal to the derived title are not stored.

use crate::types::{LabelOverrides, Window, WindowId};
use serde::Serialize;
use std::collections::HashMap;

/// Title shown for a window without a usable tab title
pub const FALLBACK_TITLE: &str = "Window";

/// Title of the active tab, else of the first tab, else [`FALLBACK_TITLE`].
pub fn derived_title(window: &Window) -> String {
    let tabs = window.tabs.as_deref().unwrap_or_default();
    tabs.iter()
        .find(|tab| tab.active)
        .or_else(|| tabs.first())
        .and_then(|tab| tab.title.as_deref())
        .filter(|title| !title.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string()
}

/// Apply a rename to `labels`. Returns the label now in effect, or `None`
/// when the override was removed.
pub fn apply_label(
    labels: &mut LabelOverrides,
    window_id: WindowId,
    label: &str,
    derived_title: &str,
) -> Option<String> {
    let key = window_id.to_string();
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed == derived_title {
        labels.remove(&key);
        return None;
    }
    labels.insert(key, trimmed.to_string());
    Some(trimmed.to_string())
}

pub fn label_for(labels: &LabelOverrides, window_id: WindowId) -> Option<&str> {
    labels.get(&window_id.to_string()).map(String::as_str)
}

/// One row of the ordered window listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummary {
    pub id: WindowId,
    /// Label override when set, derived title otherwise
    pub title: String,
    pub derived_title: String,
    pub custom: bool,
    pub tab_count: usize,
    pub active: bool,
}

/// Build the listing for `order`, skipping ids with no matching window.
pub fn summarize(
    windows: &[Window],
    order: &[WindowId],
    labels: &LabelOverrides,
    active: Option<WindowId>,
) -> Vec<WindowSummary> {
    let by_id: HashMap<WindowId, &Window> = windows.iter().map(|w| (w.id, w)).collect();
    order
        .iter()
        .filter_map(|id| by_id.get(id))
        .map(|window| {
            let derived = derived_title(window);
            let label = label_for(labels, window.id).filter(|label| *label != derived);
            WindowSummary {
                id: window.id,
                title: label.unwrap_or(derived.as_str()).to_string(),
                custom: label.is_some(),
                derived_title: derived,
                tab_count: window.tab_count(),
                active: active == Some(window.id),
            }
        })
        .collect()
}
