//! Snapshot persistence adapters.

mod file_snapshot_storage;
mod memory_snapshot_storage;

pub use file_snapshot_storage::FileSnapshotStorage;
pub use memory_snapshot_storage::InMemorySnapshotStorage;
