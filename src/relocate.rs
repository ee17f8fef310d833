//! Tab Relocator
//!
//! Moves the selected tabs of the current window to the end of the adjacent
//! window in the ordering, then restores the selection and the active tab on
//! the other side. Only one relocation runs at a time; a call that arrives
//! while another is in flight is dropped, not queued.

use crate::error::ApiError;
use crate::outcome::{RelocateOutcome, RelocationReport, SkipReason};
use crate::platform::WindowPlatform;
use crate::reconcile::OrderReconciler;
use crate::types::{ring_step, TabId, TabQuery};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct TabRelocator {
    platform: Arc<dyn WindowPlatform>,
    reconciler: OrderReconciler,
    settle_delay: Duration,
    in_flight: Arc<Mutex<()>>,
}

impl TabRelocator {
    pub fn new(
        platform: Arc<dyn WindowPlatform>,
        reconciler: OrderReconciler,
        settle_delay: Duration,
    ) -> Self {
        Self {
            platform,
            reconciler,
            settle_delay,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Move the current selection `offset` windows along the ordering.
    ///
    /// Errors before the move leave every window untouched. Once the move has
    /// succeeded the relocation counts as done; failures of the follow-up
    /// steps are recorded on the report.
    pub async fn relocate_by_offset(&self, offset: isize) -> Result<RelocateOutcome, ApiError> {
        // Held for the whole call and released on every exit path.
        let Ok(_token) = self.in_flight.try_lock() else {
            debug!(offset, "relocate_by_offset: already in flight, dropping");
            return Ok(RelocateOutcome::Skipped(SkipReason::Busy));
        };
        self.relocate(offset).await
    }

    async fn relocate(&self, offset: isize) -> Result<RelocateOutcome, ApiError> {
        let Some(current) = self.platform.current_window().await? else {
            debug!(offset, "relocate: no active window");
            return Ok(RelocateOutcome::Skipped(SkipReason::NoActiveWindow));
        };

        let order = self.reconciler.reconcile().await?;
        if order.len() < 2 {
            debug!(windows = order.len(), "relocate: fewer than two windows");
            return Ok(RelocateOutcome::Skipped(SkipReason::OrderTooShort));
        }

        let source = current.id;
        let Some(located) = self.reconciler.locate_or_refresh(order, source).await? else {
            debug!(window_id = source, "relocate: active window not in order");
            return Ok(RelocateOutcome::Skipped(SkipReason::ActiveWindowUnknown));
        };
        if located.order.len() < 2 {
            return Ok(RelocateOutcome::Skipped(SkipReason::OrderTooShort));
        }

        let target = located.order[ring_step(located.index, offset, located.order.len())];
        if target == source {
            debug!(window_id = source, "relocate: target equals source");
            return Ok(RelocateOutcome::Skipped(SkipReason::TargetIsSource));
        }

        let mut selected = self
            .platform
            .query_tabs(source, TabQuery::Highlighted)
            .await?;
        if selected.is_empty() {
            selected = self.platform.query_tabs(source, TabQuery::Active).await?;
            selected.truncate(1);
        }
        selected.sort_by_key(|tab| tab.index);

        let Some(active_tab) = selected
            .iter()
            .find(|tab| tab.active)
            .or_else(|| selected.first())
            .map(|tab| tab.id)
        else {
            debug!(window_id = source, "relocate: nothing selected");
            return Ok(RelocateOutcome::Skipped(SkipReason::NoSelection));
        };
        let tab_ids: Vec<TabId> = selected.iter().map(|tab| tab.id).collect();

        let insert_at = self.platform.query_tabs(target, TabQuery::All).await?.len();

        let moved = match self.platform.move_tabs(&tab_ids, target, insert_at).await {
            Ok(moved) => moved,
            Err(e) => {
                warn!(source, target, error = %e, "Moving tabs failed");
                return Err(e.into());
            }
        };

        let mut positions: Vec<usize> = moved
            .iter()
            .filter(|tab| tab_ids.contains(&tab.id))
            .map(|tab| tab.index)
            .collect();
        positions.sort_unstable();
        if positions.is_empty() {
            warn!(source, target, "Host reported no moved tabs");
            return Ok(RelocateOutcome::Skipped(SkipReason::NothingMoved));
        }

        let mut report = RelocationReport {
            source,
            target,
            moved: tab_ids,
            positions,
            active_tab,
            focus_error: None,
            highlight_error: None,
            activate_error: None,
        };

        if let Err(e) = self.platform.focus_window(target).await {
            warn!(target, error = %e, "Focusing target window after move failed");
            report.focus_error = Some(e);
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        if let Err(e) = self.platform.highlight_tabs(target, &report.positions).await {
            warn!(target, error = %e, "Restoring selection after move failed");
            report.highlight_error = Some(e);
        }

        if let Err(e) = self.platform.activate_tab(active_tab).await {
            warn!(target, tab_id = active_tab, error = %e, "Restoring active tab after move failed");
            report.activate_error = Some(e);
        }

        info!(
            source,
            target,
            tabs = report.moved.len(),
            positions = ?report.positions,
            "Relocated tabs"
        );
        Ok(RelocateOutcome::Moved(report))
    }
}
