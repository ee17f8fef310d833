//! Window ring API
//!
//! `WindowRing` wires the reconciler, cycler, relocator and lifecycle
//! listener to one platform and one store, and is the surface the command
//! dispatcher, the CLI and scenario replay talk to.

use crate::commands::{Command, CommandAction};
use crate::config::WinringConfig;
use crate::cycle::FocusCycler;
use crate::error::ApiError;
use crate::labels::{apply_label, derived_title, summarize, WindowSummary};
use crate::lifecycle::LifecycleListener;
use crate::outcome::{FocusOutcome, RelocateOutcome};
use crate::platform::WindowPlatform;
use crate::reconcile::{dedupe_order, OrderReconciler};
use crate::relocate::TabRelocator;
use crate::store::{KeyValueStore, OrderingStore, SledKeyValueStore};
use crate::types::{LabelOverrides, WindowId, WindowOrder};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Result of a dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Focus(FocusOutcome),
    Relocate(RelocateOutcome),
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Focus(outcome) => fmt::Display::fmt(outcome, f),
            CommandOutcome::Relocate(outcome) => fmt::Display::fmt(outcome, f),
        }
    }
}

#[derive(Clone)]
pub struct WindowRing {
    platform: Arc<dyn WindowPlatform>,
    store: OrderingStore,
    reconciler: OrderReconciler,
    cycler: FocusCycler,
    relocator: TabRelocator,
}

impl WindowRing {
    pub fn new(
        platform: Arc<dyn WindowPlatform>,
        backend: Arc<dyn KeyValueStore>,
        settle_delay: Duration,
    ) -> Self {
        let store = OrderingStore::new(backend);
        let reconciler = OrderReconciler::new(platform.clone(), store.clone());
        let cycler = FocusCycler::new(platform.clone(), reconciler.clone());
        let relocator = TabRelocator::new(platform.clone(), reconciler.clone(), settle_delay);
        Self {
            platform,
            store,
            reconciler,
            cycler,
            relocator,
        }
    }

    /// Build a ring backed by the sled store named in `config`.
    pub fn from_config(
        platform: Arc<dyn WindowPlatform>,
        config: &WinringConfig,
    ) -> Result<Self, ApiError> {
        let path = config.storage.resolve_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(crate::error::StorageError::from)?;
        }
        let backend = SledKeyValueStore::new(&path)?;
        info!(path = %path.display(), "Opened ordering store");
        Ok(Self::new(
            platform,
            Arc::new(backend),
            config.relocation.settle_delay(),
        ))
    }

    pub fn store(&self) -> &OrderingStore {
        &self.store
    }

    pub async fn reconcile(&self) -> Result<WindowOrder, ApiError> {
        self.reconciler.reconcile().await
    }

    pub async fn focus_by_offset(&self, offset: isize) -> Result<FocusOutcome, ApiError> {
        self.cycler.focus_by_offset(offset).await
    }

    pub async fn relocate_by_offset(&self, offset: isize) -> Result<RelocateOutcome, ApiError> {
        self.relocator.relocate_by_offset(offset).await
    }

    /// Run one command.
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome, ApiError> {
        match command.action() {
            CommandAction::Focus(direction) => self
                .focus_by_offset(direction.offset())
                .await
                .map(CommandOutcome::Focus),
            CommandAction::Relocate(direction) => self
                .relocate_by_offset(direction.offset())
                .await
                .map(CommandOutcome::Relocate),
        }
    }

    /// Run one command on behalf of the host. Failures are logged, not
    /// returned; the host has nobody to report them to.
    pub async fn dispatch(&self, command: Command) -> Option<CommandOutcome> {
        match self.execute(command).await {
            Ok(outcome) => {
                debug!(%command, outcome = ?outcome, "Command finished");
                Some(outcome)
            }
            Err(e) => {
                warn!(%command, error = %e, "Command failed");
                None
            }
        }
    }

    /// Dispatch every command received on `commands`, each on its own task,
    /// until the sender side closes. Waits for in-flight commands before
    /// returning.
    pub async fn run_commands(&self, mut commands: mpsc::Receiver<Command>) {
        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    let ring = self.clone();
                    tasks.spawn(async move {
                        ring.dispatch(command).await;
                    });
                }
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    log_task_result(result);
                }
            }
        }
        while let Some(result) = tasks.join_next().await {
            log_task_result(result);
        }
    }

    /// Reconcile against the populated window list and describe each
    /// window in order.
    pub async fn window_summaries(&self) -> Result<Vec<WindowSummary>, ApiError> {
        let ((windows, order), current, labels) = futures::try_join!(
            self.reconciler.reconcile_windows(true),
            async { self.platform.current_window().await.map_err(ApiError::from) },
            async { self.store.read_labels().await.map_err(ApiError::from) },
        )?;
        Ok(summarize(
            &windows,
            &order,
            &labels,
            current.map(|window| window.id),
        ))
    }

    /// Set or remove the label for `window_id`. Returns the label in effect
    /// afterwards.
    pub async fn set_label(
        &self,
        window_id: WindowId,
        label: &str,
        derived_title: &str,
    ) -> Result<Option<String>, ApiError> {
        let mut labels = self.store.read_labels().await?;
        let applied = apply_label(&mut labels, window_id, label, derived_title);
        self.store.write_labels(&labels).await?;
        info!(window_id, label = ?applied, "Updated window label");
        Ok(applied)
    }

    /// Like [`WindowRing::set_label`], with the derived title taken from the
    /// window's current tabs.
    pub async fn rename_window(
        &self,
        window_id: WindowId,
        label: &str,
    ) -> Result<Option<String>, ApiError> {
        let window = self.platform.window(window_id, true).await?;
        self.set_label(window_id, label, &derived_title(&window)).await
    }

    pub async fn clear_label(&self, window_id: WindowId) -> Result<(), ApiError> {
        let mut labels = self.store.read_labels().await?;
        if labels.remove(&window_id.to_string()).is_some() {
            self.store.write_labels(&labels).await?;
            info!(window_id, "Cleared window label");
        }
        Ok(())
    }

    pub async fn labels(&self) -> Result<LabelOverrides, ApiError> {
        Ok(self.store.read_labels().await?)
    }

    /// Persist a user-chosen order. Returns false when `ids` is empty and
    /// nothing was written.
    pub async fn save_order(&self, ids: &[WindowId]) -> Result<bool, ApiError> {
        if ids.is_empty() {
            debug!("save_order: empty order ignored");
            return Ok(false);
        }
        let order = dedupe_order(ids);
        self.store.write_order(&order).await?;
        info!(order = ?order, "Saved window order");
        Ok(true)
    }

    pub async fn focus_window(&self, window_id: WindowId) -> Result<(), ApiError> {
        self.cycler.focus_window(window_id).await
    }

    pub fn lifecycle(&self) -> LifecycleListener {
        LifecycleListener::new(self.reconciler.clone(), self.store.clone())
    }

    /// Subscribe to the platform's window events and keep the ordering in
    /// step on a background task.
    pub fn spawn_lifecycle(&self) -> JoinHandle<()> {
        let events = self.platform.subscribe();
        tokio::spawn(self.lifecycle().run(events))
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!(error = %e, "Command task panicked");
    }
}
