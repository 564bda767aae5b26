//! Atomic file operations
//!
//! Snapshot files are never written in place. Content goes to a `.tmp`
//! sibling first, is synced to disk, and only then becomes visible under
//! its final name.
//!
//! # Pattern
//!
//! 1. Create the temporary file (.tmp) exclusively
//! 2. Call sync_all() to flush to disk
//! 3. Hard-link the temp file to the final path (fails if the name is taken)
//! 4. Remove the temp file
//!
//! A reader therefore sees either no file or the complete file, and an
//! existing file is never replaced.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Atomically create a new file with the given content
///
/// Fails with [`AtomicError::AlreadyExists`] if either the final path or
/// its `.tmp` sibling already exists, so two writers racing for the same
/// name never clobber each other.
///
/// # Example
///
/// ```ignore
/// atomic_write_new("backups/backup-2026-10-19T08-30-00-123Z.json", "{}")?;
/// ```
pub fn atomic_write_new<P: AsRef<Path>>(path: P, content: &str) -> AtomicResult<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if path.exists() {
        return Err(AtomicError::AlreadyExists(path.to_path_buf()));
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(AtomicError::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let written = file
        .write_all(content.as_bytes())
        .and_then(|_| file.sync_all());
    drop(file);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    // hard_link refuses to replace an existing path, unlike rename
    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(AtomicError::AlreadyExists(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Clean up any leftover temp files from interrupted operations
///
/// Call this on startup to clean up .tmp files that may have been
/// left behind from crashes. Only files whose name starts with `prefix`
/// are touched; other writers' temp files in the same directory survive.
pub fn cleanup_temp_files<P: AsRef<Path>>(dir: P, prefix: &str) -> AtomicResult<usize> {
    let dir = dir.as_ref();
    let mut cleaned = 0;

    if !dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let owned = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with(prefix) && name.ends_with(".tmp"))
            .unwrap_or(false);

        if owned && path.is_file() {
            match fs::remove_file(&path) {
                Ok(()) => cleaned += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(cleaned)
}
