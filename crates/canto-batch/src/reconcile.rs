//! Audio reconciliation.
//!
//! Compares the entries a section should have spoken against the artifacts
//! present in its audio directory. Matching is by id: an artifact counts for
//! an entry only when its file stem equals the entry id, so stray files in the
//! directory never hide a missing artifact. Nothing here writes to disk or
//! talks to the speech service.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use canto_core::entities::Entry;
use canto_core::enums::SectionState;
use canto_core::responses::SectionStatus;

use crate::layout::SectionLayout;
use crate::loader::{LoadError, load_section};

/// Artifacts found in a section's audio directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioListing {
    /// Whether the directory exists.
    pub exists: bool,
    /// File stems of every artifact with the configured extension.
    pub stems: BTreeSet<String>,
}

impl AudioListing {
    #[must_use]
    pub fn count(&self) -> usize {
        self.stems.len()
    }
}

/// List the artifacts in `dir` whose extension matches `extension`,
/// ignoring case. Subdirectories and other files are not counted.
///
/// # Errors
///
/// Returns the I/O error if the directory exists but cannot be read.
pub fn list_artifacts(dir: &Path, extension: &str) -> std::io::Result<AudioListing> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AudioListing::default());
        }
        Err(error) => return Err(error),
    };

    let mut stems = BTreeSet::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }
        let path = dir_entry.path();
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches_ext {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            stems.insert(stem.to_string());
        }
    }

    Ok(AudioListing {
        exists: true,
        stems,
    })
}

/// Reconcile a section's entries against its audio listing.
///
/// Entries whose id cannot name a file are reported in `invalid_ids` and are
/// neither expected nor missing, since no run could ever produce them.
#[must_use]
pub fn reconcile(section: &str, entries: &[Entry], listing: &AudioListing) -> SectionStatus {
    let mut expected_ids = HashSet::new();
    let mut missing_ids = Vec::new();
    let mut invalid_ids = Vec::new();
    for entry in entries.iter().filter(|entry| entry.has_text()) {
        let Ok(stem) = entry.id.file_stem() else {
            invalid_ids.push(entry.id.to_string());
            continue;
        };
        if !expected_ids.insert(stem.clone()) {
            continue;
        }
        if !listing.stems.contains(&stem) {
            missing_ids.push(stem);
        }
    }

    // Stale is measured against every id, spoken or not, so an artifact left
    // behind for an entry whose text was cleared is not reported as stray.
    let known: HashSet<String> = entries
        .iter()
        .filter_map(|entry| entry.id.file_stem().ok())
        .collect();
    let stale_ids: Vec<String> = listing
        .stems
        .iter()
        .filter(|stem| !known.contains(*stem))
        .cloned()
        .collect();

    let state = if missing_ids.is_empty() {
        SectionState::Complete
    } else {
        SectionState::Missing
    };

    SectionStatus {
        section: section.to_string(),
        has_audio: listing.exists,
        current: listing.count(),
        expected: expected_ids.len(),
        missing: missing_ids.len(),
        stale: stale_ids.len(),
        state,
        missing_ids,
        stale_ids,
        invalid_ids,
    }
}

/// Load and reconcile one section.
///
/// An absent data file yields a `no_data` status. Unreadable data or audio
/// directories are logged and reported the same way so one broken section
/// never stops a full check.
#[must_use]
pub fn check_section(layout: &SectionLayout, section: &str) -> SectionStatus {
    let listing = match list_artifacts(&layout.audio_dir(section), layout.extension()) {
        Ok(listing) => listing,
        Err(error) => {
            tracing::warn!(section, %error, "failed to list audio directory");
            AudioListing {
                exists: true,
                stems: BTreeSet::new(),
            }
        }
    };

    match load_section(layout, section) {
        Ok(entries) => reconcile(section, &entries, &listing),
        Err(LoadError::NotFound { .. }) => {
            tracing::debug!(section, "no data file");
            SectionStatus::no_data(section, listing.exists, listing.count())
        }
        Err(error) => {
            tracing::warn!(section, %error, "failed to load section data");
            SectionStatus::no_data(section, listing.exists, listing.count())
        }
    }
}

/// Reconcile every section in `sections`, in order.
#[must_use]
pub fn check_all<S: AsRef<str>>(layout: &SectionLayout, sections: &[S]) -> Vec<SectionStatus> {
    sections
        .iter()
        .map(|section| check_section(layout, section.as_ref()))
        .collect()
}

/// Sections whose state is `missing`.
#[must_use]
pub fn missing_sections(statuses: &[SectionStatus]) -> Vec<&SectionStatus> {
    statuses.iter().filter(|status| status.needs_audio()).collect()
}
