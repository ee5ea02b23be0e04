// src/engine/mod.rs

//! The rebuild-or-reload decision cycle.
//!
//! One run, one decision: load the committed snapshot, take a fresh one,
//! and either rebuild the index through the [`IndexingService`] collaborator
//! (committing the new snapshot only after the rebuild persisted) or reload
//! the previously persisted index artifact.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Settings;
use crate::index::IndexingService;
use crate::tracker::{self, DirectorySnapshot, ScanFilter, StateError};

/// How the index handle returned by [`prepare_index`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Rebuilt from the source documents; the new snapshot was committed.
    Rebuilt,
    /// Reloaded from the persisted artifact; nothing was written.
    Reloaded,
}

/// Obtain an up-to-date index handle, rebuilding only when the watched
/// directory changed since the last committed snapshot.
///
/// A corrupt state file is demoted to "no prior state" (forced rebuild):
/// the state is a cache, not a source of truth. A reload that fails because
/// the index artifact is missing or unreadable also falls back to a full
/// rebuild. The snapshot is committed strictly after `build_index` and
/// `persist_index` succeed, so an interrupted run re-detects the same
/// change next time.
pub fn prepare_index<I: IndexingService>(
    indexer: &I,
    settings: &Settings,
    force_rebuild: bool,
) -> Result<(I::Handle, IndexSource)> {
    let state_path = settings.state_path();
    let previous = load_previous(&state_path);
    let current = scan(settings)?;

    let rebuild = force_rebuild || tracker::needs_rebuild(&current, previous.as_ref());

    if !rebuild {
        info!("no changes detected, reloading persisted index");
        match indexer.load_index(&settings.paths.storage_dir) {
            Ok(handle) => return Ok((handle, IndexSource::Reloaded)),
            Err(err) => {
                warn!(error = %err, "persisted index unusable, rebuilding");
            }
        }
    } else if force_rebuild {
        info!("rebuild forced");
    } else {
        info!("changes detected in data directory or no usable prior state");
    }

    let handle = rebuild_and_commit(indexer, settings, &current, &state_path)?;
    Ok((handle, IndexSource::Rebuilt))
}

/// Decision only: would the next [`prepare_index`] rebuild? No documents are
/// loaded and nothing is written.
pub fn check(settings: &Settings) -> Result<bool> {
    let state_path = settings.state_path();
    let previous = load_previous(&state_path);
    let current = scan(settings)?;
    Ok(tracker::needs_rebuild(&current, previous.as_ref()))
}

fn scan(settings: &Settings) -> Result<DirectorySnapshot> {
    let filter = ScanFilter::new(&settings.watch.include, &settings.watch.exclude)?;
    tracker::compute_snapshot(&settings.paths.data_dir, &filter)
        .with_context(|| format!("scanning {:?}", settings.paths.data_dir))
}

fn load_previous(state_path: &Path) -> Option<DirectorySnapshot> {
    match tracker::load_state(state_path) {
        Ok(previous) => previous,
        Err(StateError::Corrupt { path, reason }) => {
            warn!(path = ?path, reason = %reason, "state file corrupt, treating as absent");
            None
        }
        Err(StateError::Io { path, source }) => {
            warn!(path = ?path, error = %source, "state file unreadable, treating as absent");
            None
        }
    }
}

fn rebuild_and_commit<I: IndexingService>(
    indexer: &I,
    settings: &Settings,
    current: &DirectorySnapshot,
    state_path: &Path,
) -> Result<I::Handle> {
    let documents = indexer
        .load_documents(&settings.paths.data_dir)
        .context("loading documents")?;
    let handle = indexer.build_index(documents).context("building index")?;
    indexer
        .persist_index(&handle, &settings.paths.storage_dir)
        .context("persisting index")?;

    // Only now is the snapshot allowed to become the committed state.
    tracker::commit(current, state_path).context("committing snapshot")?;

    info!(files = current.len(), "index rebuilt and snapshot committed");
    Ok(handle)
}
