//! Snapshot Store - timestamped JSON snapshots with bounded retention
//!
//! Every save creates a new file, files are never edited in place, and after
//! each save the oldest surplus files are deleted so at most `keep_count`
//! snapshots remain.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::StoreConfig;
use super::error::{StoreError, StoreResult};
use super::naming::{
    is_plain_file_name, is_snapshot_name, sequence_key, snapshot_filename, LATEST_SENTINEL,
    SNAPSHOT_PREFIX,
};
use crate::utils::{atomic_write_new, cleanup_temp_files, AtomicError};

/// Upper bound on counter suffixes tried for one timestamp
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Metadata of a stored snapshot, derived from the filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time, the authoritative ordering key
    #[serde(rename = "created", serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

/// ISO-8601 with millisecond precision, e.g. `2026-10-19T08:30:00.123Z`
fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Outcome of a successful save
#[derive(Debug, Clone)]
pub struct SavedSnapshot {
    /// Name of the newly written snapshot
    pub filename: String,
    /// Snapshots deleted by the retention pass that followed the write
    pub evicted: Vec<String>,
}

/// The newest snapshot together with its parsed content
#[derive(Debug, Clone)]
pub struct LatestSnapshot {
    pub info: SnapshotInfo,
    pub data: Value,
}

/// Directory-backed store of JSON snapshots
///
/// Cloning is cheap; clones share the same configuration and directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: Arc<StoreConfig>,
}

impl SnapshotStore {
    /// Open the store, creating its directory if needed
    ///
    /// Leftover `.tmp` files from interrupted writes are removed.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(config.dir())?;

        let cleaned = cleanup_temp_files(config.dir(), SNAPSHOT_PREFIX)?;
        if cleaned > 0 {
            info!(count = cleaned, "Removed leftover temp files");
        }

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Retention limit applied after every save
    pub fn keep_count(&self) -> usize {
        self.config.keep_count
    }

    /// Persist `payload` as a new pretty-printed snapshot, then enforce retention
    pub fn save<T: Serialize + ?Sized>(&self, payload: &T) -> StoreResult<SavedSnapshot> {
        self.save_with(payload, |path| fs::remove_file(path))
    }

    /// `save` with the file removal used by eviction supplied by the caller
    fn save_with<T, F>(&self, payload: &T, remove: F) -> StoreResult<SavedSnapshot>
    where
        T: Serialize + ?Sized,
        F: FnMut(&Path) -> io::Result<()>,
    {
        let content = serde_json::to_string_pretty(payload).map_err(StoreError::Serialization)?;
        let filename = self.write_new(Utc::now(), &content)?;

        info!(filename = %filename, bytes = content.len(), "Saved backup");

        let evicted = self.evict(self.config.keep_count, remove);
        Ok(SavedSnapshot { filename, evicted })
    }

    /// Write `content` under the first free name for `at`
    fn write_new(&self, at: DateTime<Utc>, content: &str) -> StoreResult<String> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = snapshot_filename(at, attempt);
            match atomic_write_new(self.config.snapshot_path(&filename), content) {
                Ok(()) => return Ok(filename),
                Err(AtomicError::AlreadyExists(_)) => {
                    debug!(filename = %filename, "Backup name taken, trying next");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free backup name for {}", snapshot_filename(at, 0)),
        )))
    }

    /// List all snapshots, newest first
    pub fn list(&self) -> StoreResult<Vec<SnapshotInfo>> {
        let mut snapshots = Vec::new();

        for entry in fs::read_dir(self.config.dir())? {
            let entry = entry?;

            let Some(filename) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !is_snapshot_name(&filename) {
                continue;
            }

            // Eviction may remove a file between read_dir and stat
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            snapshots.push(SnapshotInfo {
                filename,
                size: metadata.len(),
                created_at: DateTime::<Utc>::from(metadata.modified()?),
            });
        }

        snapshots.sort_by(newest_first);
        Ok(snapshots)
    }

    /// Load the newest snapshot, or `None` when the store is empty
    pub fn latest(&self) -> StoreResult<Option<LatestSnapshot>> {
        let Some(info) = self.list()?.into_iter().next() else {
            return Ok(None);
        };

        let data = self.read_snapshot(&info.filename)?;
        info!(filename = %info.filename, "Loaded latest backup");

        Ok(Some(LatestSnapshot { info, data }))
    }

    /// Load a snapshot by filename
    ///
    /// Names that could resolve outside the store directory, and the
    /// `latest` sentinel, are rejected with [`StoreError::InvalidName`].
    pub fn get(&self, filename: &str) -> StoreResult<Value> {
        if filename == LATEST_SENTINEL || !is_plain_file_name(filename) {
            return Err(StoreError::InvalidName(filename.to_string()));
        }
        if !is_snapshot_name(filename) {
            return Err(StoreError::NotFound(filename.to_string()));
        }

        self.read_snapshot(filename)
    }

    fn read_snapshot(&self, filename: &str) -> StoreResult<Value> {
        let path = self.config.snapshot_path(filename);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(filename.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::CorruptData {
            filename: filename.to_string(),
            source,
        })
    }

    /// Delete every snapshot beyond the `keep_count` newest
    ///
    /// Best effort: failures are logged and skipped, never returned.
    /// Returns the names that were actually deleted.
    fn evict<F>(&self, keep_count: usize, mut remove: F) -> Vec<String>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        let snapshots = match self.list() {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(error = %e, "Could not list backups for cleanup");
                return Vec::new();
            }
        };

        if snapshots.len() <= keep_count {
            return Vec::new();
        }

        let mut evicted = Vec::new();
        for snapshot in snapshots.into_iter().skip(keep_count) {
            match remove(&self.config.snapshot_path(&snapshot.filename)) {
                Ok(()) => {
                    info!(filename = %snapshot.filename, "Deleted old backup");
                    evicted.push(snapshot.filename);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(filename = %snapshot.filename, "Old backup already gone");
                }
                Err(e) => {
                    warn!(filename = %snapshot.filename, error = %e, "Failed to delete old backup");
                }
            }
        }

        evicted
    }
}

/// Newest modification time first; ties fall back to the name's timestamp and counter
fn newest_first(a: &SnapshotInfo, b: &SnapshotInfo) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| sequence_key(&b.filename).cmp(&sequence_key(&a.filename)))
        .then_with(|| b.filename.cmp(&a.filename))
}
