// src/tracker/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled include/exclude globs applied while scanning the watched
/// directory.
///
/// Patterns are matched against paths relative to the watched root with `/`
/// separators (e.g. `"notes/2024/plan.md"`). An empty include list means
/// "everything". Hidden files and directories (leading `.` on any path
/// component) are always skipped, matching the behaviour of the document
/// loader the index is built from.
#[derive(Clone, Default)]
pub struct ScanFilter {
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for ScanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanFilter")
            .field("has_include", &self.include_set.is_some())
            .field("has_exclude", &self.exclude_set.is_some())
            .finish()
    }
}

impl ScanFilter {
    /// Compile include/exclude patterns. Fails on an invalid glob so the
    /// problem surfaces at config load, not silently during a scan.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include_set: build_set(include)?,
            exclude_set: build_set(exclude)?,
        })
    }

    /// Should the file at `rel_path` be part of the snapshot?
    pub fn matches(&self, rel_path: &str) -> bool {
        if is_hidden(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        match &self.include_set {
            Some(include) => include.is_match(rel_path),
            None => true,
        }
    }

    /// Should the directory at `rel_path` be pruned from the walk entirely?
    /// Only hidden directories are pruned; exclude globs are file-level.
    pub fn skips_dir(&self, rel_path: &str) -> bool {
        is_hidden(rel_path)
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern:?}"))?;
        builder.add(glob);
    }
    let set = builder.build().context("compiling glob set")?;
    Ok(Some(set))
}

fn is_hidden(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .any(|component| component.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_accepts_everything_visible() {
        let filter = ScanFilter::default();
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("sub/deep/b.md"));
        assert!(!filter.matches(".hidden"));
        assert!(!filter.matches("sub/.cache/x"));
        assert!(filter.skips_dir(".git"));
    }

    #[test]
    fn include_and_exclude_globs_apply() {
        let filter = ScanFilter::new(
            &["**/*.md".to_string(), "**/*.txt".to_string()],
            &["drafts/**".to_string()],
        )
        .unwrap();
        assert!(filter.matches("notes/plan.md"));
        assert!(filter.matches("a.txt"));
        assert!(!filter.matches("image.png"));
        assert!(!filter.matches("drafts/plan.md"));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(ScanFilter::new(&["[".to_string()], &[]).is_err());
    }
}
