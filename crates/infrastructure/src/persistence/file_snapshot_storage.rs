//! File-backed snapshot storage.
//!
//! Each key is stored as `<dir>/<key>.json`. The default directory is the
//! platform config directory:
//! - Linux: ~/.config/sessiongate
//! - macOS: ~/Library/Application Support/sessiongate
//! - Windows: %APPDATA%/sessiongate

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sessiongate_application::ports::{SnapshotStorage, StorageError};
use tokio::fs;
use tracing::debug;

/// Snapshot storage under a single directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    dir: PathBuf,
}

impl FileSnapshotStorage {
    /// Creates storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates storage in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn in_config_dir() -> Result<Self, StorageError> {
        Self::default_dir()
            .map(Self::new)
            .ok_or_else(|| StorageError::Unavailable("no config directory on this platform".to_string()))
    }

    /// Returns the platform default directory, if the platform has one.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sessiongate"))
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Rejects keys that would escape the storage directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid snapshot key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SnapshotStorage for FileSnapshotStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!("{}: {e}", path.display()))),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        // Ensure storage directory exists
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.dir.display())))?;

        // Write to a sibling file first so readers never see a torn snapshot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!("{}: {e}", path.display()))),
        }
    }
}
