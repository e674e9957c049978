//! Volatile snapshot storage.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sessiongate_application::ports::{SnapshotStorage, StorageError};

/// Snapshot storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySnapshotStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SnapshotStorage for InMemorySnapshotStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
