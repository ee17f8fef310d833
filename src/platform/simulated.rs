//! In-memory browser used by tests, the CLI `simulate` command and scenario
//! replay.
//!
//! Behaves like a tabbed browser host: windows keep creation order, the first
//! tab of a new window is active, moving every tab out of a window closes it,
//! and highlighting a selection makes its first position active. Faults can
//! be injected to exercise the ring's error paths.

use crate::error::PlatformError;
use crate::platform::{WindowEvent, WindowPlatform};
use crate::types::{Tab, TabId, TabQuery, Window, WindowId, WindowKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct SimTab {
    id: TabId,
    title: String,
    active: bool,
    highlighted: bool,
}

#[derive(Debug, Clone)]
struct SimWindow {
    id: WindowId,
    kind: WindowKind,
    tabs: Vec<SimTab>,
}

impl SimWindow {
    fn snapshot(&self, focused: bool, populate: bool) -> Window {
        Window {
            id: self.id,
            kind: self.kind,
            focused,
            tabs: populate.then(|| self.tab_snapshots()),
        }
    }

    fn tab_snapshots(&self) -> Vec<Tab> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| self.tab_snapshot(index, tab))
            .collect()
    }

    fn tab_snapshot(&self, index: usize, tab: &SimTab) -> Tab {
        Tab {
            id: tab.id,
            window_id: self.id,
            index,
            title: Some(tab.title.clone()),
            active: tab.active,
            highlighted: tab.highlighted,
        }
    }

    fn activate_index(&mut self, index: usize) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.active = i == index;
        }
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.highlighted = true;
        }
    }
}

#[derive(Default)]
struct SimState {
    windows: Vec<SimWindow>,
    next_window_id: WindowId,
    next_tab_id: TabId,
    focused: Option<WindowId>,
    hidden: HashMap<WindowId, usize>,
    reject_next_move: Option<String>,
    fail_focus: bool,
    fail_highlight: bool,
    focus_requests: Vec<WindowId>,
    enumerations: usize,
    move_calls: usize,
}

impl SimState {
    fn position(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    fn get(&self, id: WindowId) -> Result<&SimWindow, PlatformError> {
        self.windows
            .iter()
            .find(|w| w.id == id)
            .ok_or(PlatformError::WindowNotFound(id))
    }

    fn get_mut(&mut self, id: WindowId) -> Result<&mut SimWindow, PlatformError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(PlatformError::WindowNotFound(id))
    }

    fn locate_tab(&self, tab_id: TabId) -> Option<(usize, usize)> {
        self.windows.iter().enumerate().find_map(|(w, window)| {
            window
                .tabs
                .iter()
                .position(|t| t.id == tab_id)
                .map(|t| (w, t))
        })
    }

    fn alloc_tabs(&mut self, titles: &[&str]) -> Vec<SimTab> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                self.next_tab_id += 1;
                SimTab {
                    id: self.next_tab_id,
                    title: title.to_string(),
                    active: i == 0,
                    highlighted: i == 0,
                }
            })
            .collect()
    }

    /// Remove a window and move focus to the most recently created survivor
    fn remove_window(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.windows.remove(pos);
        self.hidden.remove(&id);
        if self.focused == Some(id) {
            self.focused = self.windows.last().map(|w| w.id);
        }
        true
    }
}

/// Simulated tabbed-browser host
pub struct SimulatedBrowser {
    state: Mutex<SimState>,
    events: broadcast::Sender<WindowEvent>,
}

impl Default for SimulatedBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBrowser {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(SimState::default()),
            events,
        }
    }

    fn emit(&self, event: WindowEvent) {
        // No subscribers is fine; nobody is tracking lifecycle yet.
        let _ = self.events.send(event);
    }

    /// Open a window with one tab per title. The new window takes focus.
    pub fn open_window(&self, kind: WindowKind, titles: &[&str]) -> WindowId {
        let window = {
            let mut state = self.state.lock();
            let mut id = state.next_window_id + 1;
            while state.position(id).is_some() {
                id += 1;
            }
            state.next_window_id = id;
            Self::insert_window(&mut state, id, kind, titles)
        };
        let id = window.id;
        self.emit(WindowEvent::Created(window));
        id
    }

    /// Open a window reusing a specific id, as hosts do after a close
    pub fn open_window_with_id(
        &self,
        id: WindowId,
        kind: WindowKind,
        titles: &[&str],
    ) -> Result<WindowId, PlatformError> {
        let window = {
            let mut state = self.state.lock();
            if state.position(id).is_some() {
                return Err(PlatformError::Rejected(format!("window {id} already open")));
            }
            Self::insert_window(&mut state, id, kind, titles)
        };
        self.emit(WindowEvent::Created(window));
        Ok(id)
    }

    fn insert_window(
        state: &mut SimState,
        id: WindowId,
        kind: WindowKind,
        titles: &[&str],
    ) -> Window {
        let tabs = state.alloc_tabs(titles);
        let window = SimWindow { id, kind, tabs };
        let snapshot = window.snapshot(true, false);
        state.windows.push(window);
        state.focused = Some(id);
        snapshot
    }

    pub fn close_window(&self, id: WindowId) -> Result<(), PlatformError> {
        if !self.state.lock().remove_window(id) {
            return Err(PlatformError::WindowNotFound(id));
        }
        self.emit(WindowEvent::Removed(id));
        Ok(())
    }

    /// Make `id` the current window without recording a focus request
    pub fn set_focused(&self, id: WindowId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.get(id)?;
        state.focused = Some(id);
        Ok(())
    }

    /// Replace the highlighted flags of a window without touching `active`
    pub fn set_highlighted(&self, id: WindowId, indices: &[usize]) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let window = state.get_mut(id)?;
        for (i, tab) in window.tabs.iter_mut().enumerate() {
            tab.highlighted = indices.contains(&i);
        }
        Ok(())
    }

    /// Make the tab at `index` the only active tab without touching highlights
    pub fn set_active(&self, id: WindowId, index: usize) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let window = state.get_mut(id)?;
        if index >= window.tabs.len() {
            return Err(PlatformError::Rejected(format!(
                "window {id} has no tab at index {index}"
            )));
        }
        for (i, tab) in window.tabs.iter_mut().enumerate() {
            tab.active = i == index;
        }
        Ok(())
    }

    /// Clear every active flag in a window
    pub fn clear_active(&self, id: WindowId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        for tab in state.get_mut(id)?.tabs.iter_mut() {
            tab.active = false;
        }
        Ok(())
    }

    /// Leave `id` out of the next `times` enumerations
    pub fn hide_from_enumeration(&self, id: WindowId, times: usize) {
        self.state.lock().hidden.insert(id, times);
    }

    pub fn reject_next_move(&self, reason: impl Into<String>) {
        self.state.lock().reject_next_move = Some(reason.into());
    }

    pub fn fail_focus_requests(&self, fail: bool) {
        self.state.lock().fail_focus = fail;
    }

    pub fn fail_highlight_requests(&self, fail: bool) {
        self.state.lock().fail_highlight = fail;
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.state.lock().windows.iter().map(|w| w.id).collect()
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.state.lock().focused
    }

    pub fn tab_titles(&self, id: WindowId) -> Vec<String> {
        self.with_window(id, |w| w.tabs.iter().map(|t| t.title.clone()).collect())
    }

    pub fn tab_ids(&self, id: WindowId) -> Vec<TabId> {
        self.with_window(id, |w| w.tabs.iter().map(|t| t.id).collect())
    }

    pub fn highlighted_titles(&self, id: WindowId) -> Vec<String> {
        self.with_window(id, |w| {
            w.tabs
                .iter()
                .filter(|t| t.highlighted)
                .map(|t| t.title.clone())
                .collect()
        })
    }

    pub fn active_title(&self, id: WindowId) -> Option<String> {
        self.with_window(id, |w| {
            w.tabs.iter().find(|t| t.active).map(|t| t.title.clone())
        })
    }

    /// Every `focus_window` call served so far, including failed ones
    pub fn focus_requests(&self) -> Vec<WindowId> {
        self.state.lock().focus_requests.clone()
    }

    pub fn enumeration_count(&self) -> usize {
        self.state.lock().enumerations
    }

    pub fn move_count(&self) -> usize {
        self.state.lock().move_calls
    }

    fn with_window<T: Default>(&self, id: WindowId, f: impl FnOnce(&SimWindow) -> T) -> T {
        let state = self.state.lock();
        state.get(id).map(f).unwrap_or_default()
    }
}

#[async_trait]
impl WindowPlatform for SimulatedBrowser {
    async fn normal_windows(&self, populate: bool) -> Result<Vec<Window>, PlatformError> {
        let mut state = self.state.lock();
        state.enumerations += 1;
        let focused = state.focused;
        let mut out = Vec::new();
        let SimState {
            windows, hidden, ..
        } = &mut *state;
        for window in windows.iter().filter(|w| w.kind == WindowKind::Normal) {
            if let Some(remaining) = hidden.get_mut(&window.id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    continue;
                }
            }
            out.push(window.snapshot(focused == Some(window.id), populate));
        }
        hidden.retain(|_, remaining| *remaining > 0);
        Ok(out)
    }

    async fn window(&self, id: WindowId, populate: bool) -> Result<Window, PlatformError> {
        let state = self.state.lock();
        let focused = state.focused == Some(id);
        Ok(state.get(id)?.snapshot(focused, populate))
    }

    async fn current_window(&self) -> Result<Option<Window>, PlatformError> {
        let state = self.state.lock();
        Ok(state
            .focused
            .and_then(|id| state.get(id).ok())
            .map(|w| w.snapshot(true, false)))
    }

    async fn focus_window(&self, id: WindowId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        state.focus_requests.push(id);
        if state.fail_focus {
            return Err(PlatformError::Rejected(format!("focus of window {id} refused")));
        }
        state.get(id)?;
        state.focused = Some(id);
        Ok(())
    }

    async fn query_tabs(
        &self,
        window_id: WindowId,
        query: TabQuery,
    ) -> Result<Vec<Tab>, PlatformError> {
        let state = self.state.lock();
        Ok(state
            .get(window_id)?
            .tab_snapshots()
            .into_iter()
            .filter(|t| query.matches(t))
            .collect())
    }

    async fn move_tabs(
        &self,
        tab_ids: &[TabId],
        target: WindowId,
        index: usize,
    ) -> Result<Vec<Tab>, PlatformError> {
        let mut closed = Vec::new();
        let moved = {
            let mut state = self.state.lock();
            state.move_calls += 1;
            if let Some(reason) = state.reject_next_move.take() {
                return Err(PlatformError::Rejected(reason));
            }
            let target_window = state.get(target)?;
            if target_window.kind != WindowKind::Normal {
                return Err(PlatformError::Rejected(format!(
                    "window {target} does not accept tabs"
                )));
            }

            let mut ids: Vec<TabId> = Vec::with_capacity(tab_ids.len());
            for id in tab_ids {
                if state.locate_tab(*id).is_none() {
                    return Err(PlatformError::TabNotFound(*id));
                }
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }

            // Detach in batch order, remembering where each source lost a tab.
            let mut detached = Vec::with_capacity(ids.len());
            let mut sources: Vec<(WindowId, usize)> = Vec::new();
            for id in &ids {
                let Some((w, t)) = state.locate_tab(*id) else {
                    continue;
                };
                let window = &mut state.windows[w];
                let mut tab = window.tabs.remove(t);
                tab.active = false;
                tab.highlighted = false;
                if window.id != target && !sources.iter().any(|(s, _)| *s == window.id) {
                    sources.push((window.id, t));
                }
                detached.push(tab);
            }

            let target_window = state.get_mut(target)?;
            let start = index.min(target_window.tabs.len());
            for (offset, tab) in detached.into_iter().enumerate() {
                target_window.tabs.insert(start + offset, tab);
            }
            if !target_window.tabs.iter().any(|t| t.active) {
                target_window.activate_index(start);
            }
            let moved: Vec<Tab> = target_window
                .tabs
                .iter()
                .enumerate()
                .filter(|(_, t)| ids.contains(&t.id))
                .map(|(i, t)| target_window.tab_snapshot(i, t))
                .collect();

            for (source, lost_at) in sources {
                let Ok(window) = state.get_mut(source) else {
                    continue;
                };
                if window.tabs.is_empty() {
                    state.remove_window(source);
                    closed.push(source);
                } else if !window.tabs.iter().any(|t| t.active) {
                    let fallback = lost_at.min(window.tabs.len() - 1);
                    window.activate_index(fallback);
                }
            }
            moved
        };

        for id in closed {
            self.emit(WindowEvent::Removed(id));
        }
        Ok(moved)
    }

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let (w, t) = state
            .locate_tab(tab_id)
            .ok_or(PlatformError::TabNotFound(tab_id))?;
        let window = &mut state.windows[w];
        let keep_selection = window.tabs[t].highlighted;
        for (i, tab) in window.tabs.iter_mut().enumerate() {
            tab.active = i == t;
            if !keep_selection {
                tab.highlighted = i == t;
            }
        }
        Ok(())
    }

    async fn highlight_tabs(
        &self,
        window_id: WindowId,
        indices: &[usize],
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        if state.fail_highlight {
            return Err(PlatformError::Rejected(format!(
                "highlight in window {window_id} refused"
            )));
        }
        let window = state.get_mut(window_id)?;
        let Some(first) = indices.first().copied() else {
            return Ok(());
        };
        if let Some(bad) = indices.iter().find(|i| **i >= window.tabs.len()) {
            return Err(PlatformError::Rejected(format!(
                "window {window_id} has no tab at index {bad}"
            )));
        }
        for (i, tab) in window.tabs.iter_mut().enumerate() {
            tab.highlighted = indices.contains(&i);
            tab.active = i == first;
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<WindowEvent> {
        self.events.subscribe()
    }
}
