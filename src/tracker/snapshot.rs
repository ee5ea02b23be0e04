// src/tracker/snapshot.rs

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{bail, Context, Result};
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tracker::path_utils::relative_key;
use crate::tracker::patterns::ScanFilter;

/// One tracked file inside a snapshot, keyed by its relative path in
/// [`DirectorySnapshot::records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Hex-encoded blake3 digest of the file's byte content.
    pub fingerprint: String,

    /// Seconds since the Unix epoch at last modification. Advisory only;
    /// [`needs_rebuild`] never looks at it, so touching a file without
    /// changing its bytes does not trigger a rebuild.
    pub modified_time: u64,
}

/// The state of the watched directory tree at one instant: exactly one
/// record per regular file under the root, recursively. Immutable once
/// built; a fresh snapshot is computed on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub records: BTreeMap<String, FileRecord>,
}

impl DirectorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Compute the fingerprint of a single file.
///
/// Reads in fixed 8 KiB chunks with a streaming hasher, so memory stays
/// constant regardless of file size.
pub fn compute_file_fingerprint(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = File::open(path)
        .with_context(|| format!("opening file for fingerprinting: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Take a snapshot of every regular file under `root` that passes `filter`.
///
/// Paths are recorded relative to `root` with `/` separators, so snapshots
/// compare stably across platforms. Fails if `root` does not exist or a file
/// becomes unreadable mid-scan (e.g. deleted between enumeration and
/// hashing); callers should abort the decision cycle rather than guess.
/// No side effects.
pub fn compute_snapshot(root: &Path, filter: &ScanFilter) -> Result<DirectorySnapshot> {
    if !root.is_dir() {
        bail!("watched directory does not exist: {:?}", root);
    }

    let mut records = BTreeMap::new();
    walk_dir(root, root, filter, &mut records)?;
    debug!(files = records.len(), root = ?root, "snapshot computed");
    Ok(DirectorySnapshot { records })
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    filter: &ScanFilter,
    records: &mut BTreeMap<String, FileRecord>,
) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {:?}", dir))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat for {:?}", path))?;

        let rel = relative_key(root, &path)?;

        if file_type.is_dir() {
            if filter.skips_dir(&rel) {
                debug!(dir = %rel, "skipping excluded directory");
                continue;
            }
            walk_dir(root, &path, filter, records)?;
        } else if file_type.is_file() {
            if !filter.matches(&rel) {
                debug!(file = %rel, "skipping filtered file");
                continue;
            }
            let fingerprint = compute_file_fingerprint(&path)?;
            let modified_time = modified_secs(&path)?;
            records.insert(
                rel,
                FileRecord {
                    fingerprint,
                    modified_time,
                },
            );
        }
        // Symlinks and other special entries are ignored.
    }

    Ok(())
}

fn modified_secs(path: &Path) -> Result<u64> {
    let meta = std::fs::metadata(path).with_context(|| format!("metadata for {:?}", path))?;
    let mtime = meta
        .modified()
        .with_context(|| format!("mtime for {:?}", path))?;
    Ok(mtime
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0))
}

/// Decide whether the persisted index is stale.
///
/// Pure comparison, no I/O:
/// - `previous` absent (first run, or unparsable state) -> `true`;
/// - any file added or removed -> `true`;
/// - any fingerprint mismatch on a shared path -> `true`;
/// - identical key sets with identical fingerprints -> `false`.
///
/// `modified_time` is deliberately ignored so clock skew and
/// touch-without-modify cannot force or suppress a rebuild.
pub fn needs_rebuild(current: &DirectorySnapshot, previous: Option<&DirectorySnapshot>) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    if current.records.len() != previous.records.len() {
        return true;
    }

    for (path, record) in &current.records {
        match previous.records.get(path) {
            Some(prev) if prev.fingerprint == record.fingerprint => {}
            _ => return true,
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(entries: &[(&str, &str)]) -> DirectorySnapshot {
        let records = entries
            .iter()
            .map(|(path, fp)| {
                (
                    path.to_string(),
                    FileRecord {
                        fingerprint: fp.to_string(),
                        modified_time: 0,
                    },
                )
            })
            .collect();
        DirectorySnapshot { records }
    }

    #[test]
    fn absent_previous_always_rebuilds() {
        assert!(needs_rebuild(&snap(&[]), None));
        assert!(needs_rebuild(&snap(&[("a.txt", "aa")]), None));
    }

    #[test]
    fn identical_snapshots_do_not_rebuild() {
        let a = snap(&[("a.txt", "aa"), ("sub/b.txt", "bb")]);
        let b = snap(&[("sub/b.txt", "bb"), ("a.txt", "aa")]);
        assert!(!needs_rebuild(&a, Some(&b)));
    }

    #[test]
    fn added_removed_and_modified_files_rebuild() {
        let base = snap(&[("a.txt", "aa"), ("b.txt", "bb")]);

        let added = snap(&[("a.txt", "aa"), ("b.txt", "bb"), ("c.txt", "cc")]);
        assert!(needs_rebuild(&added, Some(&base)));

        let removed = snap(&[("a.txt", "aa")]);
        assert!(needs_rebuild(&removed, Some(&base)));

        let modified = snap(&[("a.txt", "aa"), ("b.txt", "BB")]);
        assert!(needs_rebuild(&modified, Some(&base)));
    }

    #[test]
    fn mtime_only_change_is_ignored() {
        let mut newer = snap(&[("a.txt", "aa")]);
        newer.records.get_mut("a.txt").unwrap().modified_time = 99;
        let older = snap(&[("a.txt", "aa")]);
        assert!(!needs_rebuild(&newer, Some(&older)));
    }
}
