//! Host platform surface
//!
//! The window ring never talks to a concrete windowing system. Everything it
//! needs from the host (enumerate windows, query and move tabs, change focus,
//! observe window lifecycle) goes through [`WindowPlatform`]. Every call is a
//! suspension point; nothing here is cancellable.

pub mod simulated;

pub use simulated::SimulatedBrowser;

use crate::error::PlatformError;
use crate::types::{Tab, TabId, TabQuery, Window, WindowId};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Window lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// A window of any kind was opened. Tabs are not populated.
    Created(Window),
    Removed(WindowId),
}

#[async_trait]
pub trait WindowPlatform: Send + Sync {
    /// Enumerate windows of kind normal, in host enumeration order
    async fn normal_windows(&self, populate: bool) -> Result<Vec<Window>, PlatformError>;

    async fn window(&self, id: WindowId, populate: bool) -> Result<Window, PlatformError>;

    /// The window the user is currently working in, if any
    async fn current_window(&self) -> Result<Option<Window>, PlatformError>;

    async fn focus_window(&self, id: WindowId) -> Result<(), PlatformError>;

    async fn query_tabs(
        &self,
        window_id: WindowId,
        query: TabQuery,
    ) -> Result<Vec<Tab>, PlatformError>;

    /// Move a batch of tabs into `target` starting at `index`.
    ///
    /// The batch is atomic: on error no tab has moved. Returns the moved tabs
    /// with their new positions.
    async fn move_tabs(
        &self,
        tab_ids: &[TabId],
        target: WindowId,
        index: usize,
    ) -> Result<Vec<Tab>, PlatformError>;

    async fn activate_tab(&self, tab_id: TabId) -> Result<(), PlatformError>;

    /// Replace the highlighted selection of a window with the tabs at
    /// `indices`. The host makes the first listed position active.
    async fn highlight_tabs(
        &self,
        window_id: WindowId,
        indices: &[usize],
    ) -> Result<(), PlatformError>;

    fn subscribe(&self) -> broadcast::Receiver<WindowEvent>;

    /// Ids of the live normal windows, in enumeration order
    async fn live_window_ids(&self) -> Result<Vec<WindowId>, PlatformError> {
        Ok(self
            .normal_windows(false)
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect())
    }
}
