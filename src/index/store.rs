// src/index/store.rs

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::index::{chunk_text, Document, IndexingService};
use crate::tracker::path_utils::relative_key;
use crate::tracker::ScanFilter;

/// File name of the persisted chunk artifact inside the storage directory.
pub const CHUNKS_FILE: &str = "chunks.json";

const CHUNKS_VERSION: u32 = 1;

/// Reference [`IndexingService`] backed by a flat persisted chunk store.
///
/// Documents are read as text, split into fixed character windows with
/// overlap, and written as one JSON artifact. There is no ranking or
/// embedding here; the store exists to exercise the sync engine and to
/// document the collaborator contract.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    chunk_size: usize,
    chunk_overlap: usize,
    filter: ScanFilter,
}

/// In-memory handle over the chunked corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Relative path of the source document.
    pub doc: String,
    /// Position of this chunk within the document, starting at 0.
    pub seq: usize,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChunksFile {
    version: u32,
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    pub fn new(chunk_size: usize, chunk_overlap: usize, filter: ScanFilter) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            filter,
        }
    }

    fn collect_files(&self, root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("reading directory {:?}", dir))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
            let path = entry.path();
            let rel = relative_key(root, &path)?;
            if path.is_dir() {
                if !self.filter.skips_dir(&rel) {
                    self.collect_files(root, &path, out)?;
                }
            } else if path.is_file() && self.filter.matches(&rel) {
                out.push(path);
            }
        }
        Ok(())
    }
}

impl IndexingService for ChunkStore {
    type Handle = ChunkIndex;

    fn load_documents(&self, dir: &Path) -> Result<Vec<Document>> {
        if !dir.is_dir() {
            bail!("document directory does not exist: {:?}", dir);
        }

        let mut files = Vec::new();
        self.collect_files(dir, dir, &mut files)?;
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            let bytes =
                fs::read(&path).with_context(|| format!("reading document {:?}", path))?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            documents.push(Document {
                relative_path: relative_key(dir, &path)?,
                text,
            });
        }

        info!(documents = documents.len(), dir = ?dir, "loaded documents");
        Ok(documents)
    }

    fn build_index(&self, documents: Vec<Document>) -> Result<ChunkIndex> {
        let mut chunks = Vec::new();
        for doc in &documents {
            for (seq, text) in chunk_text(&doc.text, self.chunk_size, self.chunk_overlap)
                .into_iter()
                .enumerate()
            {
                chunks.push(Chunk {
                    doc: doc.relative_path.clone(),
                    seq,
                    text,
                });
            }
        }
        debug!(chunks = chunks.len(), "built chunk index");
        Ok(ChunkIndex { chunks })
    }

    fn persist_index(&self, handle: &ChunkIndex, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("creating storage dir {:?}", dir))?;
        let path = dir.join(CHUNKS_FILE);
        let file =
            File::create(&path).with_context(|| format!("creating index artifact {:?}", path))?;
        let mut writer = BufWriter::new(file);
        let payload = ChunksFile {
            version: CHUNKS_VERSION,
            chunks: handle.chunks.clone(),
        };
        serde_json::to_writer(&mut writer, &payload)
            .with_context(|| format!("writing index artifact {:?}", path))?;
        writer.flush()?;
        info!(chunks = handle.chunks.len(), path = ?path, "persisted index");
        Ok(())
    }

    fn load_index(&self, dir: &Path) -> Result<ChunkIndex> {
        let path = dir.join(CHUNKS_FILE);
        let file =
            File::open(&path).with_context(|| format!("opening index artifact {:?}", path))?;
        let payload: ChunksFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing index artifact {:?}", path))?;
        if payload.version != CHUNKS_VERSION {
            bail!(
                "unsupported index artifact version {} in {:?}",
                payload.version,
                path
            );
        }
        debug!(chunks = payload.chunks.len(), path = ?path, "reloaded index");
        Ok(ChunkIndex {
            chunks: payload.chunks,
        })
    }
}
