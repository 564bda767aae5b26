//! Idea Flow Backup Server
//!
//! A small persistence side-channel for the Idea Flow frontend: the client
//! posts its full state as JSON, the server keeps it as a timestamped file
//! and hands back the latest one on startup.
//!
//! # Features
//!
//! - **Timestamped snapshots**: one pretty-printed JSON file per save
//! - **Bounded retention**: only the newest `keep_count` files survive a save
//! - **Latest lookup**: newest snapshot by modification time
//! - **Safe names**: lookups cannot escape the backup directory
//!
//! # Modules
//!
//! - `store`: Snapshot store, naming convention and retention
//! - `api`: Axum router and REST handlers
//! - `config`: Command-line / environment configuration
//! - `utils`: Atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use idea_flow_backup::{SnapshotStore, StoreConfig};
//! use serde_json::json;
//!
//! fn main() -> Result<(), idea_flow_backup::StoreError> {
//!     let store = SnapshotStore::open(StoreConfig::new("backups").with_keep_count(20))?;
//!     let saved = store.save(&json!({"ideas": []}))?;
//!     let latest = store.latest()?;
//!     assert_eq!(latest.map(|l| l.info.filename), Some(saved.filename));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod store;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{ConfigError, HttpConfig, ServerConfig};
pub use store::{
    LatestSnapshot, SavedSnapshot, SnapshotInfo, SnapshotStore, StoreConfig, StoreError,
    StoreResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
