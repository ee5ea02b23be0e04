// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{Settings, CREDENTIAL_ENV_VAR};
use crate::config::validate::validate_settings;
use crate::errors::Result;

/// Load a configuration file and return the raw `Settings`.
///
/// A missing file is not an error: every section has defaults, so the tool
/// runs without any `Docdex.toml` at all. This only performs TOML
/// deserialization; use [`load_and_validate`] for semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = ?path, "no config file, using defaults");
            return Ok(Settings::default());
        }
        Err(err) => return Err(err.into()),
    };

    let settings: Settings = toml::from_str(&contents)?;
    Ok(settings)
}

/// Load configuration from path, pick up the environment credential, and run
/// validation. This is the entry point the rest of the application uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let mut settings = load_from_path(&path)?;
    settings.credential = std::env::var(CREDENTIAL_ENV_VAR).ok();
    validate_settings(&settings)?;
    Ok(settings)
}

/// Default config path: `Docdex.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Docdex.toml")
}
