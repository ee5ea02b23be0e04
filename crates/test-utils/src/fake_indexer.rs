use std::cell::RefCell;
use std::path::Path;

use anyhow::{anyhow, Result};
use docdex::index::{Document, IndexingService};

/// Calls observed on a [`FakeIndexer`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexerCall {
    LoadDocuments,
    BuildIndex,
    PersistIndex,
    LoadIndex,
}

/// A fake indexing service that:
/// - records every call it receives,
/// - returns a canned document list,
/// - can be scripted to fail at any step.
#[derive(Debug, Default)]
pub struct FakeIndexer {
    pub calls: RefCell<Vec<IndexerCall>>,
    pub documents: Vec<Document>,
    pub fail_build: bool,
    pub fail_persist: bool,
    pub fail_load_index: bool,
}

impl FakeIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<IndexerCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: IndexerCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// Handle type for the fake: just the documents it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeHandle {
    pub documents: Vec<Document>,
}

impl IndexingService for FakeIndexer {
    type Handle = FakeHandle;

    fn load_documents(&self, _dir: &Path) -> Result<Vec<Document>> {
        self.record(IndexerCall::LoadDocuments);
        Ok(self.documents.clone())
    }

    fn build_index(&self, documents: Vec<Document>) -> Result<FakeHandle> {
        self.record(IndexerCall::BuildIndex);
        if self.fail_build {
            return Err(anyhow!("scripted build failure"));
        }
        Ok(FakeHandle { documents })
    }

    fn persist_index(&self, _handle: &FakeHandle, _dir: &Path) -> Result<()> {
        self.record(IndexerCall::PersistIndex);
        if self.fail_persist {
            return Err(anyhow!("scripted persist failure"));
        }
        Ok(())
    }

    fn load_index(&self, _dir: &Path) -> Result<FakeHandle> {
        self.record(IndexerCall::LoadIndex);
        if self.fail_load_index {
            return Err(anyhow!("scripted reload failure"));
        }
        Ok(FakeHandle {
            documents: self.documents.clone(),
        })
    }
}
