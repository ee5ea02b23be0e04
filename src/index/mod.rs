// src/index/mod.rs

//! Indexing collaborator contract.
//!
//! The tracker decides *whether* to rebuild; everything about *how* an index
//! is built, persisted, and reloaded sits behind [`IndexingService`]. The
//! in-tree [`ChunkStore`] implements the contract over a plain persisted
//! document store so the binary runs end to end; a real deployment plugs in
//! a vector index behind the same trait.

pub mod store;

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use store::ChunkStore;

/// One loaded source document, text plus its path relative to the data
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub relative_path: String,
    pub text: String,
}

/// External indexing service consumed by the sync engine.
///
/// `load_index` failing is not fatal to the caller: the engine treats a
/// missing or unreadable index artifact as a reason to fall back to a full
/// rebuild.
pub trait IndexingService {
    type Handle;

    /// Read and prepare raw files under `dir` for indexing.
    fn load_documents(&self, dir: &Path) -> Result<Vec<Document>>;

    /// Construct a searchable index from loaded documents.
    fn build_index(&self, documents: Vec<Document>) -> Result<Self::Handle>;

    /// Write index artifacts to durable storage under `dir`.
    fn persist_index(&self, handle: &Self::Handle, dir: &Path) -> Result<()>;

    /// Reconstruct a previously persisted index without rebuilding.
    fn load_index(&self, dir: &Path) -> Result<Self::Handle>;
}

/// Split `text` into fixed-size character windows with `overlap` characters
/// carried over between consecutive chunks.
///
/// Every character of the input appears in at least one chunk; the final
/// chunk may be shorter than `size`. Degenerate arguments are clamped so the
/// window always advances: a `size` of 0 behaves as 1, and an `overlap` of
/// `size` or more behaves as `size - 1`. Config validation rejects such
/// values up front; the clamp keeps the function total for library callers.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let size = size.max(1);

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}
