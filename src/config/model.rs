// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration as read from `Docdex.toml`.
///
/// ```toml
/// [paths]
/// data_dir = "./data"
/// storage_dir = "./storage"
///
/// [chunking]
/// chunk_size = 512
/// chunk_overlap = 10
///
/// [model]
/// name = "gpt-4o"
/// context_prompt = "You are a helpful assistant"
///
/// [watch]
/// include = ["**/*.md", "**/*.txt"]
/// exclude = ["drafts/**"]
/// ```
///
/// All sections are optional and default to the values above (with an empty
/// `[watch]`, meaning every visible file is tracked).
///
/// The resulting [`Settings`] value is constructed once at startup and
/// passed explicitly to the indexing and chat collaborators; nothing reads
/// configuration from process-global state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub chunking: ChunkingSection,

    #[serde(default)]
    pub model: ModelSection,

    #[serde(default)]
    pub watch: WatchSection,

    /// Opaque credential for the chat/embedding backend, from the
    /// `DOCDEX_API_KEY` environment variable. Never read from the TOML file
    /// and never logged.
    #[serde(skip)]
    pub credential: Option<String>,
}

impl Settings {
    /// Path of the tracker's persisted state file inside the storage dir.
    pub fn state_path(&self) -> PathBuf {
        self.paths.storage_dir.join("data_state.json")
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./storage")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_dir: default_storage_dir(),
        }
    }
}

/// `[chunking]` section. Window size and overlap are in characters.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSection {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    512
}

fn default_chunk_overlap() -> usize {
    10
}

impl Default for ChunkingSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// `[model]` section, forwarded opaquely to the chat collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSection {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_context_prompt")]
    pub context_prompt: String,
}

fn default_model_name() -> String {
    "gpt-4o".to_string()
}

fn default_context_prompt() -> String {
    "You are a helpful assistant".to_string()
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            context_prompt: default_context_prompt(),
        }
    }
}

/// `[watch]` section: glob patterns relative to `data_dir`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Environment variable holding the backend credential.
pub const CREDENTIAL_ENV_VAR: &str = "DOCDEX_API_KEY";

/// Override a loaded `Settings` with CLI-provided paths, if any.
pub fn apply_overrides(
    settings: &mut Settings,
    data_dir: Option<&Path>,
    storage_dir: Option<&Path>,
) {
    if let Some(dir) = data_dir {
        settings.paths.data_dir = dir.to_path_buf();
    }
    if let Some(dir) = storage_dir {
        settings.paths.storage_dir = dir.to_path_buf();
    }
}
