//! Ordering Store
//!
//! Key-value persistence for the window ordering and the label overrides.
//! Backends only provide `get`/`set` on JSON values; there is no locking and
//! no cross-key transaction, so callers re-read right before every write.

pub mod memory;
pub mod persistence;

pub use memory::MemoryKeyValueStore;
pub use persistence::SledKeyValueStore;

use crate::error::StorageError;
use crate::types::{LabelOverrides, WindowId, WindowOrder};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Storage key of the persisted window ordering
pub const ORDER_KEY: &str = "windowOrder";

/// Storage key of the window label overrides
pub const LABELS_KEY: &str = "windowTitleOverrides";

/// Asynchronous key-value backend
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Typed access to the two persisted entries.
#[derive(Clone)]
pub struct OrderingStore {
    backend: Arc<dyn KeyValueStore>,
}

impl OrderingStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read the persisted ordering.
    ///
    /// Returns `None` when nothing is stored or the stored value is not a
    /// sequence. Entries that are not valid window ids are dropped. An
    /// undecodable value is treated as absent so the next write replaces it.
    pub async fn read_order(&self) -> Result<Option<WindowOrder>, StorageError> {
        let raw = match self.backend.get(ORDER_KEY).await {
            Ok(raw) => raw,
            Err(StorageError::Decode { key, source }) => {
                warn!(key = %key, error = %source, "Discarding undecodable window order");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(raw.as_ref().and_then(decode_order))
    }

    pub async fn write_order(&self, order: &[WindowId]) -> Result<(), StorageError> {
        let value = serde_json::to_value(order).map_err(|source| StorageError::Encode {
            key: ORDER_KEY.to_string(),
            source,
        })?;
        self.backend.set(ORDER_KEY, value).await
    }

    /// Read the label overrides. Anything that is not a string-to-string
    /// object entry with a non-empty label is ignored, and an undecodable
    /// value reads as no labels.
    pub async fn read_labels(&self) -> Result<LabelOverrides, StorageError> {
        let raw = match self.backend.get(LABELS_KEY).await {
            Ok(raw) => raw,
            Err(StorageError::Decode { key, source }) => {
                warn!(key = %key, error = %source, "Discarding undecodable window labels");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(raw.as_ref().map(decode_labels).unwrap_or_default())
    }

    pub async fn write_labels(&self, labels: &LabelOverrides) -> Result<(), StorageError> {
        let value = serde_json::to_value(labels).map_err(|source| StorageError::Encode {
            key: LABELS_KEY.to_string(),
            source,
        })?;
        self.backend.set(LABELS_KEY, value).await
    }
}

fn decode_order(value: &Value) -> Option<WindowOrder> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_u64())
            .filter_map(|id| WindowId::try_from(id).ok())
            .collect(),
    )
}

fn decode_labels(value: &Value) -> LabelOverrides {
    let Some(map) = value.as_object() else {
        return LabelOverrides::new();
    };
    map.iter()
        .filter_map(|(key, label)| {
            let label = label.as_str()?.trim();
            (!label.is_empty()).then(|| (key.clone(), label.to_string()))
        })
        .collect()
}
