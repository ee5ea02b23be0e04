// src/config/validate.rs

use crate::config::model::Settings;
use crate::errors::{DocdexError, Result};
use crate::tracker::ScanFilter;

/// Semantic checks on loaded settings.
///
/// - chunk window must be non-empty and larger than the overlap, or the
///   chunker would never advance;
/// - watch patterns must compile as globs;
/// - paths must be non-empty.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.chunking.chunk_size == 0 {
        return Err(DocdexError::ConfigError(
            "[chunking].chunk_size must be >= 1 (got 0)".to_string(),
        ));
    }

    if settings.chunking.chunk_overlap >= settings.chunking.chunk_size {
        return Err(DocdexError::ConfigError(format!(
            "[chunking].chunk_overlap ({}) must be smaller than chunk_size ({})",
            settings.chunking.chunk_overlap, settings.chunking.chunk_size
        )));
    }

    if settings.paths.data_dir.as_os_str().is_empty() {
        return Err(DocdexError::ConfigError(
            "[paths].data_dir must not be empty".to_string(),
        ));
    }

    if settings.paths.storage_dir.as_os_str().is_empty() {
        return Err(DocdexError::ConfigError(
            "[paths].storage_dir must not be empty".to_string(),
        ));
    }

    // Compile once here so a bad glob fails at startup with a config error
    // instead of mid-scan.
    ScanFilter::new(&settings.watch.include, &settings.watch.exclude)
        .map_err(|err| DocdexError::ConfigError(format!("[watch] patterns: {err}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::Settings;

    #[test]
    fn default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn overlap_must_be_smaller_than_window() {
        let mut settings = Settings::default();
        settings.chunking.chunk_size = 10;
        settings.chunking.chunk_overlap = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn bad_watch_glob_is_a_config_error() {
        let mut settings = Settings::default();
        settings.watch.include = vec!["[".to_string()];
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(err, DocdexError::ConfigError(_)));
    }
}
