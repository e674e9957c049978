//! Snapshot storage port

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a snapshot storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The backing store cannot be located.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence of serialized snapshot strings.
///
/// Implementations only move strings; decoding is the caller's concern so
/// corrupt payloads can be treated as "no session" in one place.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Reads the value stored under `key`, `None` if nothing was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
