//! Section data loading.
//!
//! A section's entries come from `{data_dir}/{section}.json`, a JSON array
//! written by the phrasebook export step. When that file is absent, the
//! combined `all_data.json` export (an object keyed by section) is consulted.

use std::path::{Path, PathBuf};

use canto_core::entities::Entry;
use thiserror::Error;

use crate::layout::SectionLayout;

/// Errors raised while loading a section's entries.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither the section file nor the combined export has the section.
    #[error("Data file not found for section '{section}': {}", path.display())]
    NotFound { section: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the ordered entries of `section`.
///
/// No validation beyond JSON shape: entries with empty text are returned
/// as-is and skipped by the generator.
///
/// # Errors
///
/// [`LoadError::NotFound`] when no data exists for the section,
/// [`LoadError::Io`] / [`LoadError::Parse`] for unreadable or malformed files.
pub fn load_section(layout: &SectionLayout, section: &str) -> Result<Vec<Entry>, LoadError> {
    let path = layout.data_file(section);
    match std::fs::read(&path) {
        Ok(bytes) => parse_entries(&path, &bytes),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            load_from_combined(layout, section)?.ok_or(LoadError::NotFound {
                section: section.to_string(),
                path,
            })
        }
        Err(source) => Err(LoadError::Io { path, source }),
    }
}

fn parse_entries(path: &Path, bytes: &[u8]) -> Result<Vec<Entry>, LoadError> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `Ok(None)` when the combined export is absent or lacks the section.
fn load_from_combined(
    layout: &SectionLayout,
    section: &str,
) -> Result<Option<Vec<Entry>>, LoadError> {
    let path = layout.combined_data_file();
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(LoadError::Io { path, source }),
    };

    let mut sections: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;

    let Some(value) = sections.remove(section) else {
        return Ok(None);
    };

    tracing::debug!(section, path = %path.display(), "loading section from combined export");
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| LoadError::Parse { path, source })
}
