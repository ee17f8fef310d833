//! In-memory key-value backend used by tests and scenario replay.

use crate::error::StorageError;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Value>>,
    writes: Mutex<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value without counting it as a write
    pub fn insert(&self, key: &str, value: Value) {
        self.entries.lock().insert(key.to_string(), value);
    }

    /// Raw stored value, bypassing decoding
    pub fn value(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    /// Number of `set` calls served so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        self.entries.lock().insert(key.to_string(), value);
        *self.writes.lock() += 1;
        Ok(())
    }
}
