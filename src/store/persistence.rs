//! Persistence layer for the Ordering Store

use crate::error::StorageError;
use crate::store::KeyValueStore;
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Attempts made while another handle still holds the database lock
const OPEN_ATTEMPTS: u32 = 40;
const OPEN_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Sled-based implementation of KeyValueStore
///
/// Values are stored as JSON bytes under the UTF-8 key.
pub struct SledKeyValueStore {
    db: sled::Db,
}

impl SledKeyValueStore {
    /// Open (or create) a store at the given directory.
    ///
    /// sled releases its file lock asynchronously after the last handle is
    /// dropped, so a busy lock is retried for a bounded time before failing.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let mut attempt = 1;
        loop {
            match sled::open(path) {
                Ok(db) => return Ok(Self { db }),
                Err(e) if is_lock_busy(&e) && attempt < OPEN_ATTEMPTS => {
                    debug!(path = %path.display(), attempt, "Store locked, retrying open");
                    std::thread::sleep(OPEN_RETRY_DELAY);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(StorageError::Backend(format!(
                        "Failed to open sled database at {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

fn is_lock_busy(error: &sled::Error) -> bool {
    matches!(error, sled::Error::Io(e) if e.kind() == io::ErrorKind::WouldBlock)
}

#[async_trait]
impl KeyValueStore for SledKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let Some(raw) = self.db.get(key.as_bytes())? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&raw).map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let bytes = serde_json::to_vec(&value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.db.insert(key.as_bytes(), bytes)?;
        self.flush()
    }
}
