// src/lib.rs

pub mod chat;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod index;
pub mod logging;
pub mod tracker;

use anyhow::Result;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::apply_overrides;
use crate::config::Settings;
use crate::engine::IndexSource;
use crate::index::ChunkStore;
use crate::tracker::ScanFilter;

/// Process exit code used by `--check` when a rebuild is pending.
pub const EXIT_REBUILD_PENDING: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// Wires together config loading, the change tracker, and the chunk-store
/// indexing collaborator, then runs one sync cycle. Returns the process
/// exit code.
pub fn run(args: CliArgs) -> Result<i32> {
    let mut settings = load_and_validate(args.config_path())?;
    apply_overrides(&mut settings, args.data_dir.as_deref(), args.storage_dir.as_deref());

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(0);
    }

    if args.check {
        return if engine::check(&settings)? {
            println!("rebuild pending");
            Ok(EXIT_REBUILD_PENDING)
        } else {
            println!("up to date");
            Ok(0)
        };
    }

    let indexer = chunk_store(&settings)?;
    let (handle, source) = engine::prepare_index(&indexer, &settings, args.force_rebuild)?;

    match source {
        IndexSource::Rebuilt => {
            println!("Index created and stored successfully ({} chunks)", handle.chunks.len());
        }
        IndexSource::Reloaded => {
            println!("Index loaded successfully ({} chunks)", handle.chunks.len());
        }
    }

    Ok(0)
}

fn chunk_store(settings: &Settings) -> Result<ChunkStore> {
    let filter = ScanFilter::new(&settings.watch.include, &settings.watch.exclude)?;
    Ok(ChunkStore::new(
        settings.chunking.chunk_size,
        settings.chunking.chunk_overlap,
        filter,
    ))
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(settings: &Settings) {
    println!("docdex dry-run");
    println!("  paths.data_dir = {:?}", settings.paths.data_dir);
    println!("  paths.storage_dir = {:?}", settings.paths.storage_dir);
    println!("  state file = {:?}", settings.state_path());
    println!("  chunking.chunk_size = {}", settings.chunking.chunk_size);
    println!("  chunking.chunk_overlap = {}", settings.chunking.chunk_overlap);
    println!("  model.name = {}", settings.model.name);
    if !settings.watch.include.is_empty() {
        println!("  watch.include = {:?}", settings.watch.include);
    }
    if !settings.watch.exclude.is_empty() {
        println!("  watch.exclude = {:?}", settings.watch.exclude);
    }
    println!(
        "  credential = {}",
        if settings.credential.is_some() { "set" } else { "unset" }
    );
}
