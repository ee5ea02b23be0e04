// src/errors.rs

//! Crate-wide error type.
//!
//! Most modules return `anyhow::Result` with call-site context; this enum
//! covers the config/startup surface. The tracker has its own
//! [`crate::tracker::StateError`] so callers can tell "state file absent"
//! from "state file corrupt".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocdexError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DocdexError>;
