//! Lifecycle Listeners
//!
//! Keep the persisted ordering in step with windows opening and closing
//! outside of a cycle or relocation.

use crate::error::ApiError;
use crate::platform::WindowEvent;
use crate::reconcile::OrderReconciler;
use crate::store::OrderingStore;
use crate::types::{Window, WindowId};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct LifecycleListener {
    reconciler: OrderReconciler,
    store: OrderingStore,
}

impl LifecycleListener {
    pub fn new(reconciler: OrderReconciler, store: OrderingStore) -> Self {
        Self { reconciler, store }
    }

    /// Fold a newly created normal window into the ordering.
    ///
    /// The enumeration can lag behind the creation event, so the window is
    /// appended explicitly when reconciliation did not pick it up.
    pub async fn on_window_created(&self, window: &Window) -> Result<(), ApiError> {
        if !window.is_normal() {
            debug!(window_id = window.id, kind = ?window.kind, "Ignoring non-normal window");
            return Ok(());
        }

        let mut order = self.reconciler.reconcile().await?;
        if !order.contains(&window.id) {
            order.push(window.id);
            self.store.write_order(&order).await?;
            debug!(window_id = window.id, "Appended window missing from enumeration");
        }
        Ok(())
    }

    /// Drop a closed window from the persisted ordering without a full
    /// reconciliation. No-op while nothing has been persisted.
    pub async fn on_window_removed(&self, window_id: WindowId) -> Result<(), ApiError> {
        let Some(order) = self.store.read_order().await? else {
            return Ok(());
        };
        let pruned: Vec<WindowId> = order.into_iter().filter(|id| *id != window_id).collect();
        self.store.write_order(&pruned).await?;
        Ok(())
    }

    /// Apply one event, logging instead of propagating failures
    pub async fn handle(&self, event: &WindowEvent) {
        let result = match event {
            WindowEvent::Created(window) => self.on_window_created(window).await,
            WindowEvent::Removed(id) => self.on_window_removed(*id).await,
        };
        if let Err(e) = result {
            warn!(event = ?event, error = %e, "Lifecycle update failed");
        }
    }

    /// Apply every event already queued on `events`. Returns the number of
    /// events handled.
    pub async fn drain(&self, events: &mut broadcast::Receiver<WindowEvent>) -> usize {
        let mut handled = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle(&event).await;
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => self.resync(skipped).await,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return handled,
            }
        }
    }

    /// Apply events until the platform drops its sender
    pub async fn run(self, mut events: broadcast::Receiver<WindowEvent>) {
        info!("Lifecycle listener started");
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(RecvError::Lagged(skipped)) => self.resync(skipped).await,
                Err(RecvError::Closed) => break,
            }
        }
        info!("Lifecycle listener stopped");
    }

    /// Missed events are recovered by a full reconciliation
    async fn resync(&self, skipped: u64) {
        warn!(skipped, "Lifecycle events dropped, reconciling");
        if let Err(e) = self.reconciler.reconcile().await {
            warn!(error = %e, "Reconciliation after dropped events failed");
        }
    }
}
