use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use docdex::config::Settings;
use docdex::engine::{check, prepare_index, IndexSource};
use docdex::index::Document;
use docdex_test_utils::fake_indexer::{FakeIndexer, IndexerCall};
use docdex_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn settings_for(data_dir: &Path, storage_dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.paths.data_dir = data_dir.to_path_buf();
    settings.paths.storage_dir = storage_dir.to_path_buf();
    settings
}

fn sample_documents() -> Vec<Document> {
    vec![Document {
        relative_path: "a.txt".to_string(),
        text: "hello".to_string(),
    }]
}

#[test]
fn first_run_rebuilds_and_commits() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    let indexer = FakeIndexer::with_documents(sample_documents());

    let (_, source) = prepare_index(&indexer, &settings, false)?;

    assert_eq!(source, IndexSource::Rebuilt);
    assert_eq!(
        indexer.calls(),
        vec![
            IndexerCall::LoadDocuments,
            IndexerCall::BuildIndex,
            IndexerCall::PersistIndex,
        ]
    );
    assert!(settings.state_path().is_file());
    Ok(())
}

#[test]
fn unchanged_directory_reloads_without_writing() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());

    let first = FakeIndexer::with_documents(sample_documents());
    prepare_index(&first, &settings, false)?;
    let state_before = fs::read_to_string(settings.state_path())?;

    let second = FakeIndexer::with_documents(sample_documents());
    let (_, source) = prepare_index(&second, &settings, false)?;

    assert_eq!(source, IndexSource::Reloaded);
    assert_eq!(second.calls(), vec![IndexerCall::LoadIndex]);
    assert_eq!(fs::read_to_string(settings.state_path())?, state_before);
    Ok(())
}

#[test]
fn changed_file_forces_rebuild_on_next_run() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    prepare_index(&FakeIndexer::with_documents(sample_documents()), &settings, false)?;

    fs::write(data.path().join("a.txt"), "hello!")?;
    let indexer = FakeIndexer::with_documents(sample_documents());
    let (_, source) = prepare_index(&indexer, &settings, false)?;

    assert_eq!(source, IndexSource::Rebuilt);
    assert!(indexer.calls().contains(&IndexerCall::BuildIndex));
    Ok(())
}

#[test]
fn corrupt_state_is_treated_as_absent() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    fs::write(settings.state_path(), "not json at all")?;

    let indexer = FakeIndexer::with_documents(sample_documents());
    let (_, source) = prepare_index(&indexer, &settings, false)?;

    assert_eq!(source, IndexSource::Rebuilt);
    // The corrupt file was replaced by a valid committed snapshot.
    assert!(!check(&settings)?);
    Ok(())
}

#[test]
fn missing_index_artifact_falls_back_to_rebuild() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    prepare_index(&FakeIndexer::with_documents(sample_documents()), &settings, false)?;

    // State says "clean", but the reload is scripted to fail: the artifact
    // is effectively missing, so the engine must rebuild.
    let indexer = FakeIndexer {
        documents: sample_documents(),
        fail_load_index: true,
        ..FakeIndexer::new()
    };
    let (_, source) = prepare_index(&indexer, &settings, false)?;

    assert_eq!(source, IndexSource::Rebuilt);
    assert_eq!(
        indexer.calls(),
        vec![
            IndexerCall::LoadIndex,
            IndexerCall::LoadDocuments,
            IndexerCall::BuildIndex,
            IndexerCall::PersistIndex,
        ]
    );
    Ok(())
}

#[test]
fn failed_build_does_not_commit_state() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    let indexer = FakeIndexer {
        documents: sample_documents(),
        fail_build: true,
        ..FakeIndexer::new()
    };

    assert!(prepare_index(&indexer, &settings, false).is_err());
    assert!(!settings.state_path().exists());
    // The same change is detected again on the next run.
    assert!(check(&settings)?);
    Ok(())
}

#[test]
fn failed_persist_does_not_commit_state() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    let indexer = FakeIndexer {
        documents: sample_documents(),
        fail_persist: true,
        ..FakeIndexer::new()
    };

    assert!(prepare_index(&indexer, &settings, false).is_err());
    assert!(!settings.state_path().exists());
    Ok(())
}

#[test]
fn force_rebuild_skips_the_diff() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());
    prepare_index(&FakeIndexer::with_documents(sample_documents()), &settings, false)?;

    let indexer = FakeIndexer::with_documents(sample_documents());
    let (_, source) = prepare_index(&indexer, &settings, true)?;

    assert_eq!(source, IndexSource::Rebuilt);
    assert!(!indexer.calls().contains(&IndexerCall::LoadIndex));
    Ok(())
}

#[test]
fn check_reports_without_committing() -> TestResult {
    init_tracing();
    let data = tempdir()?;
    let storage = tempdir()?;
    fs::write(data.path().join("a.txt"), "hello")?;

    let settings = settings_for(data.path(), storage.path());

    assert!(check(&settings)?);
    // check() must not have created any state.
    assert!(!settings.state_path().exists());
    assert!(check(&settings)?);
    Ok(())
}
