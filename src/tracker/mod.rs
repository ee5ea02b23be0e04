// src/tracker/mod.rs

//! Change tracking for the watched document directory.
//!
//! Every run takes a fresh [`DirectorySnapshot`] of the data directory
//! (content fingerprints, recursive), diffs it against the snapshot committed
//! after the last successful index rebuild, and reports whether the persisted
//! index is stale. The committed snapshot lives in a small versioned JSON
//! file owned exclusively by this module.

pub mod path_utils;
pub mod patterns;
pub mod snapshot;
pub mod state;

pub use patterns::ScanFilter;
pub use snapshot::{compute_snapshot, needs_rebuild, DirectorySnapshot, FileRecord};
pub use state::{commit, load_state, StateError};
