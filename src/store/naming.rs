//! Snapshot file naming
//!
//! Snapshots are named `backup-<timestamp>.json`, where the timestamp is the
//! UTC creation time in ISO-8601 with millisecond precision and every `:` and
//! `.` replaced by `-`:
//!
//! ```text
//! backup-2026-10-19T08-30-00-123Z.json
//! backup-2026-10-19T08-30-00-123Z-1.json   (second write in the same millisecond)
//! ```

use std::path::{Component, Path};

use chrono::{DateTime, SecondsFormat, Utc};

/// Filename prefix shared by every snapshot
pub const SNAPSHOT_PREFIX: &str = "backup-";

/// Filename suffix shared by every snapshot
pub const SNAPSHOT_SUFFIX: &str = ".json";

/// Path segment reserved for the latest-snapshot lookup
pub const LATEST_SENTINEL: &str = "latest";

/// Filesystem-safe timestamp token for a snapshot created at `at`
pub fn timestamp_token(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Snapshot filename for `at`; `attempt > 0` adds a disambiguating counter
pub fn snapshot_filename(at: DateTime<Utc>, attempt: u32) -> String {
    let token = timestamp_token(at);
    if attempt == 0 {
        format!("{SNAPSHOT_PREFIX}{token}{SNAPSHOT_SUFFIX}")
    } else {
        format!("{SNAPSHOT_PREFIX}{token}-{attempt}{SNAPSHOT_SUFFIX}")
    }
}

/// Whether `name` follows the snapshot naming convention
pub fn is_snapshot_name(name: &str) -> bool {
    name.len() > SNAPSHOT_PREFIX.len() + SNAPSHOT_SUFFIX.len()
        && name.starts_with(SNAPSHOT_PREFIX)
        && name.ends_with(SNAPSHOT_SUFFIX)
        && is_plain_file_name(name)
}

/// Whether `name` is a single file name that cannot leave its directory
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == name,
        _ => false,
    }
}

/// Ordering key embedded in a snapshot name: timestamp token and counter
///
/// Comparing keys orders snapshots by creation, including same-millisecond
/// writes that only differ by counter.
pub fn sequence_key(name: &str) -> (&str, u32) {
    let stem = name
        .strip_prefix(SNAPSHOT_PREFIX)
        .and_then(|s| s.strip_suffix(SNAPSHOT_SUFFIX))
        .unwrap_or(name);

    match stem.rsplit_once('-') {
        Some((base, counter)) if base.ends_with('Z') => match counter.parse() {
            Ok(n) => (base, n),
            Err(_) => (stem, 0),
        },
        _ => (stem, 0),
    }
}
