//! Focus Cycler: move focus to the next or previous window in the ordering.

use crate::error::ApiError;
use crate::outcome::{FocusOutcome, SkipReason};
use crate::platform::WindowPlatform;
use crate::reconcile::OrderReconciler;
use crate::types::{ring_step, WindowId};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct FocusCycler {
    platform: Arc<dyn WindowPlatform>,
    reconciler: OrderReconciler,
}

impl FocusCycler {
    pub fn new(platform: Arc<dyn WindowPlatform>, reconciler: OrderReconciler) -> Self {
        Self {
            platform,
            reconciler,
        }
    }

    /// Focus the window `offset` steps away from the current one.
    pub async fn focus_by_offset(&self, offset: isize) -> Result<FocusOutcome, ApiError> {
        let (order, current) = futures::try_join!(self.reconciler.reconcile(), async {
            self.platform.current_window().await.map_err(ApiError::from)
        })?;

        let Some(current) = current else {
            debug!(offset, "focus_by_offset: no active window");
            return Ok(FocusOutcome::Skipped(SkipReason::NoActiveWindow));
        };
        if order.is_empty() {
            debug!(offset, "focus_by_offset: empty order");
            return Ok(FocusOutcome::Skipped(SkipReason::OrderTooShort));
        }

        let Some(located) = self.reconciler.locate_or_refresh(order, current.id).await? else {
            debug!(window_id = current.id, "focus_by_offset: active window not in order");
            return Ok(FocusOutcome::Skipped(SkipReason::ActiveWindowUnknown));
        };
        if located.order.len() < 2 {
            debug!(window_id = current.id, "focus_by_offset: single window");
            return Ok(FocusOutcome::Skipped(SkipReason::OrderTooShort));
        }

        let target = located.order[ring_step(located.index, offset, located.order.len())];
        self.platform.focus_window(target).await?;
        info!(from = current.id, to = target, offset, "Focused window");
        Ok(FocusOutcome::Focused {
            from: current.id,
            to: target,
        })
    }

    /// Focus a specific window
    pub async fn focus_window(&self, window_id: WindowId) -> Result<(), ApiError> {
        self.platform.focus_window(window_id).await?;
        info!(window_id, "Focused window");
        Ok(())
    }
}
