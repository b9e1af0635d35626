//! Fixture discovery — recursive glob scan with per-file parsing
//!
//! `load` produces a lazy, finite, restartable sequence: re-invoking re-scans
//! the filesystem. A file that fails to read or parse surfaces as an error
//! attributed to that path without aborting the rest of the scan.

use std::path::{Path, PathBuf};

use apicheck_core::{Fixture, FixtureError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Scan `pattern` and parse each matching file as a fixture.
///
/// Results arrive in filesystem glob order. Each entry pairs the source path
/// with that file's parse result, so one malformed fixture never hides its
/// siblings.
///
/// # Errors
///
/// Returns [`StoreError::Pattern`] if the glob pattern itself is invalid.
pub fn load(
    pattern: &str,
) -> Result<impl Iterator<Item = (PathBuf, Result<Fixture, FixtureError>)>, StoreError> {
    let paths = glob::glob(pattern).map_err(|e| StoreError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    Ok(paths.filter_map(|entry| match entry {
        Ok(path) => {
            let parsed = read_fixture(&path);
            Some((path, parsed))
        }
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable path during fixture scan");
            None
        }
    }))
}

fn read_fixture(path: &Path) -> Result<Fixture, FixtureError> {
    let name = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Read {
        path: name.clone(),
        message: e.to_string(),
    })?;
    Fixture::from_json(name, &content)
}
