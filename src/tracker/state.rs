// src/tracker/state.rs

//! Persistence of the last-indexed snapshot.
//!
//! The state file is a cache, not a source of truth: it is written only by
//! [`commit`] after a successful index rebuild, and an unparsable file is a
//! recoverable condition (treat as absent, rebuild). Interruption before
//! commit leaves the previous file intact, so the same pending change is
//! detected again on the next run (at-least-once rebuild semantics).
//!
//! No locking: two processes committing against the same state file is
//! undefined behaviour. The surrounding tool is single-session.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::tracker::snapshot::DirectorySnapshot;

/// Schema version written into every state file. Bump on incompatible
/// changes; older readers then treat the file as corrupt and rebuild.
const STATE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("reading state file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not parse into the expected schema.
    /// Callers should treat this like "no prior state" (forced rebuild),
    /// not as a fatal condition.
    #[error("corrupt state file {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    #[serde(flatten)]
    snapshot: DirectorySnapshot,
}

/// Load the snapshot committed by the last successful rebuild.
///
/// `Ok(None)` when no state file exists yet (first run, not an error).
pub fn load_state(path: &Path) -> Result<Option<DirectorySnapshot>, StateError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = ?path, "no prior state file");
            return Ok(None);
        }
        Err(err) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let parsed: StateFile = serde_json::from_str(&contents).map_err(|err| StateError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    if parsed.version != STATE_VERSION {
        return Err(StateError::Corrupt {
            path: path.to_path_buf(),
            reason: format!(
                "unsupported state version {} (expected {})",
                parsed.version, STATE_VERSION
            ),
        });
    }

    debug!(files = parsed.snapshot.len(), path = ?path, "loaded prior state");
    Ok(Some(parsed.snapshot))
}

/// Atomically replace the state file with `snapshot`.
///
/// Writes to a temporary sibling and renames over the target, so a crash or
/// full disk mid-write never leaves a partial state file; the previous state
/// stays readable until the rename lands. Call only after the matching index
/// rebuild has completed successfully.
pub fn commit(snapshot: &DirectorySnapshot, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {:?}", parent))?;
        }
    }

    let tmp_path = tmp_sibling(path);
    if let Err(err) = write_then_rename(snapshot, &tmp_path, path) {
        // Best effort: the prior state file is untouched either way, but a
        // stranded temp sibling should not pile up next to it.
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    info!(files = snapshot.len(), path = ?path, "committed snapshot");
    Ok(())
}

fn write_then_rename(
    snapshot: &DirectorySnapshot,
    tmp_path: &Path,
    path: &Path,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let file = File::create(tmp_path)
        .with_context(|| format!("creating temp state file {:?}", tmp_path))?;
    let mut writer = BufWriter::new(file);
    let state = StateFile {
        version: STATE_VERSION,
        snapshot: snapshot.clone(),
    };
    serde_json::to_writer_pretty(&mut writer, &state)
        .with_context(|| format!("serializing state to {:?}", tmp_path))?;
    writer
        .flush()
        .with_context(|| format!("flushing state file {:?}", tmp_path))?;

    fs::rename(tmp_path, path)
        .with_context(|| format!("renaming {:?} over {:?}", tmp_path, path))
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state".to_string());
    name.push_str(".tmp");
    path.with_file_name(name)
}
