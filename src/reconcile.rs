//! Order Reconciler
//!
//! Repairs the persisted ordering against the live window set. The repair
//! itself is the pure [`reconcile_order`]; [`OrderReconciler`] fetches both
//! inputs, runs it and writes the result back unconditionally. Running it on
//! its own output changes nothing, so concurrent reconciliations only cost a
//! redundant write.

use crate::error::ApiError;
use crate::platform::WindowPlatform;
use crate::store::OrderingStore;
use crate::types::{Window, WindowId, WindowOrder};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Correct `persisted` against `live`.
///
/// Survivors of `persisted` keep their relative order (first occurrence wins
/// when the stored value carries duplicates); live windows missing from it are
/// appended in enumeration order. An absent or empty `persisted` yields `live`.
pub fn reconcile_order(live: &[WindowId], persisted: Option<&[WindowId]>) -> WindowOrder {
    let persisted = match persisted {
        Some(order) if !order.is_empty() => order,
        _ => return live.to_vec(),
    };

    let live_set: HashSet<WindowId> = live.iter().copied().collect();
    let mut seen = HashSet::with_capacity(live.len());
    let mut order: WindowOrder = persisted
        .iter()
        .copied()
        .filter(|id| live_set.contains(id) && seen.insert(*id))
        .collect();
    order.extend(live.iter().copied().filter(|id| seen.insert(*id)));

    if order.is_empty() {
        return live.to_vec();
    }
    order
}

/// Drop repeated ids, keeping each id's first position
pub fn dedupe_order(ids: &[WindowId]) -> WindowOrder {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Result of looking a window up in a reconciled ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub order: WindowOrder,
    pub index: usize,
}

/// Single write path for the persisted ordering
#[derive(Clone)]
pub struct OrderReconciler {
    platform: Arc<dyn WindowPlatform>,
    store: OrderingStore,
}

impl OrderReconciler {
    pub fn new(platform: Arc<dyn WindowPlatform>, store: OrderingStore) -> Self {
        Self { platform, store }
    }

    /// Reconcile and persist the ordering
    pub async fn reconcile(&self) -> Result<WindowOrder, ApiError> {
        let (_, order) = self.reconcile_windows(false).await?;
        Ok(order)
    }

    /// Reconcile and persist the ordering, also returning the enumerated
    /// windows (with tabs when `populate` is set).
    pub async fn reconcile_windows(
        &self,
        populate: bool,
    ) -> Result<(Vec<Window>, WindowOrder), ApiError> {
        let (windows, persisted) = futures::try_join!(
            async {
                self.platform
                    .normal_windows(populate)
                    .await
                    .map_err(ApiError::from)
            },
            async { self.store.read_order().await.map_err(ApiError::from) },
        )?;

        let live: Vec<WindowId> = windows.iter().map(|w| w.id).collect();
        let order = reconcile_order(&live, persisted.as_deref());
        self.store.write_order(&order).await?;

        debug!(
            live = live.len(),
            persisted = persisted.as_ref().map(Vec::len),
            order = ?order,
            "Reconciled window order"
        );
        Ok((windows, order))
    }

    /// Find `window_id` in `order`; on a miss reconcile exactly once more and
    /// retry. Never loops, so a host that never reports the window cannot
    /// stall the caller.
    pub async fn locate_or_refresh(
        &self,
        order: WindowOrder,
        window_id: WindowId,
    ) -> Result<Option<Located>, ApiError> {
        if let Some(index) = order.iter().position(|id| *id == window_id) {
            return Ok(Some(Located { order, index }));
        }

        debug!(window_id, "Active window missing from order, reconciling again");
        let order = self.reconcile().await?;
        Ok(order
            .iter()
            .position(|id| *id == window_id)
            .map(|index| Located { order, index }))
    }
}
