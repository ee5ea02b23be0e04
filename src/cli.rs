// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `docdex`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "docdex",
    version,
    about = "Keep a persisted document index in sync with a watched directory.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Docdex.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Watched document directory (overrides `[paths].data_dir`).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage directory for index artifacts and tracker state
    /// (overrides `[paths].storage_dir`).
    #[arg(long, value_name = "DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Report whether a rebuild is needed and exit without rebuilding.
    /// Exit code 0 means up to date, 2 means a rebuild is pending.
    #[arg(long)]
    pub check: bool,

    /// Rebuild even if no changes are detected.
    #[arg(long)]
    pub force_rebuild: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOCDEX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration and exit without touching disk.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Effective config path: the `--config` flag, or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::default_config_path)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
