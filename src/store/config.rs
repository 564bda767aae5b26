//! Store configuration

use std::path::{Path, PathBuf};

/// Number of snapshots kept when no retention limit is configured
pub const DEFAULT_KEEP_COUNT: usize = 20;

/// Configuration for the SnapshotStore
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the snapshot files
    pub dir: PathBuf,
    /// Maximum number of snapshots retained after a write
    pub keep_count: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("backups"),
            keep_count: DEFAULT_KEEP_COUNT,
        }
    }
}

impl StoreConfig {
    /// Create config with custom snapshot directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the retention limit (at least one snapshot is always kept)
    pub fn with_keep_count(mut self, keep_count: usize) -> Self {
        self.keep_count = keep_count.max(1);
        self
    }

    /// Get the snapshot directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the path of a snapshot file inside the store directory
    pub fn snapshot_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}
