//! Snapshot Store Module
//!
//! Persists opaque JSON documents as timestamped files in one directory:
//! - `SnapshotStore`: save / list / latest / get, with retention after each save
//! - `StoreConfig`: directory and retention limit
//! - `naming`: the `backup-<timestamp>.json` convention
//!
//! # Layout
//!
//! ```text
//! backups/
//! ├── backup-2026-10-19T08-30-00-123Z.json   ◄── newest (greatest mtime)
//! ├── backup-2026-10-19T08-29-41-007Z.json
//! └── ...                                    ◄── at most keep_count files
//! ```

mod config;
mod error;
pub mod naming;
mod snapshot_store;

pub use config::{StoreConfig, DEFAULT_KEEP_COUNT};
pub use error::{StoreError, StoreResult};
pub use snapshot_store::{LatestSnapshot, SavedSnapshot, SnapshotInfo, SnapshotStore};
