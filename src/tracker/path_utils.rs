// src/tracker/path_utils.rs

//! Path handling shared by the scanner and the document loader.

use std::path::Path;

use anyhow::{Context, Result};

/// Convert `path` into a string relative to `root`, with forward slashes.
///
/// Snapshot records and chunk artifacts are keyed by these strings, so they
/// must compare stably across platforms and across runs.
pub fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("path {:?} escapes root {:?}", path, root))?;
    Ok(rel.to_string_lossy().replace('\\', "/"))
}
