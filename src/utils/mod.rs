//! Utility functions and helpers
//!
//! This module contains the atomic file helpers used by the snapshot store.

pub mod atomic;

pub use atomic::{atomic_write_new, cleanup_temp_files, AtomicError, AtomicResult};
