//! Core domain types shared by the reconciler, cycler and relocator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host-assigned window identifier. Unique among open windows, may be reused
/// once a window closes.
pub type WindowId = u32;

/// Host-assigned tab identifier.
pub type TabId = u32;

/// Persisted cyclic traversal order over windows. Never holds duplicates.
pub type WindowOrder = Vec<WindowId>;

/// User-chosen window labels keyed by the window id rendered as a string.
pub type LabelOverrides = BTreeMap<String, String>;

/// Kind of top-level window. Only `Normal` windows take part in the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    #[default]
    Normal,
    Popup,
    App,
    Devtools,
}

/// A tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    /// Zero-based left-to-right position inside the window
    pub index: usize,
    pub title: Option<String>,
    pub active: bool,
    pub highlighted: bool,
}

/// A top-level window. `tabs` is only populated when requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub kind: WindowKind,
    pub focused: bool,
    #[serde(default)]
    pub tabs: Option<Vec<Tab>>,
}

impl Window {
    pub fn is_normal(&self) -> bool {
        self.kind == WindowKind::Normal
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Which tabs of a window to return from a tab query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabQuery {
    All,
    Highlighted,
    Active,
}

impl TabQuery {
    pub fn matches(&self, tab: &Tab) -> bool {
        match self {
            TabQuery::All => true,
            TabQuery::Highlighted => tab.highlighted,
            TabQuery::Active => tab.active,
        }
    }
}

/// Direction of travel through the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleDirection {
    Next,
    Previous,
}

impl CycleDirection {
    pub fn offset(self) -> isize {
        match self {
            CycleDirection::Next => 1,
            CycleDirection::Previous => -1,
        }
    }
}

/// Index reached by stepping `offset` positions from `index` in a ring of
/// `len` elements. `len` must be non-zero.
pub fn ring_step(index: usize, offset: isize, len: usize) -> usize {
    let len = len as isize;
    (index as isize + offset).rem_euclid(len) as usize
}
