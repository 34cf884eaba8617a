//! Response types returned by `canto` commands.
//!
//! These structs define the shape of the output for `canto check`,
//! `canto generate` and `canto say`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{SectionOutcome, SectionState};

/// Reconciliation result for one section (`canto check`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionStatus {
    pub section: String,
    /// Whether the section's audio directory exists.
    pub has_audio: bool,
    /// Audio files currently in the directory.
    pub current: usize,
    /// Entries with text, i.e. artifacts that should exist.
    pub expected: usize,
    pub missing: usize,
    /// Audio files whose stem matches no entry id.
    pub stale: usize,
    pub state: SectionState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stale_ids: Vec<String>,
    /// Entries with text whose id cannot name a file. Not counted as expected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_ids: Vec<String>,
}

impl SectionStatus {
    /// Status for a section whose data file does not exist.
    #[must_use]
    pub fn no_data(section: &str, has_audio: bool, current: usize) -> Self {
        Self {
            section: section.to_string(),
            has_audio,
            current,
            expected: 0,
            missing: 0,
            stale: 0,
            state: SectionState::NoData,
            missing_ids: Vec::new(),
            stale_ids: Vec::new(),
            invalid_ids: Vec::new(),
        }
    }

    #[must_use]
    pub const fn needs_audio(&self) -> bool {
        matches!(self.state, SectionState::Missing)
    }
}

/// Response from `canto check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckReport {
    pub sections: Vec<SectionStatus>,
    /// Names of the sections whose state is `missing`, in catalog order.
    pub missing_sections: Vec<String>,
}

impl CheckReport {
    #[must_use]
    pub fn new(sections: Vec<SectionStatus>) -> Self {
        let missing_sections = sections
            .iter()
            .filter(|status| status.needs_audio())
            .map(|status| status.section.clone())
            .collect();
        Self {
            sections,
            missing_sections,
        }
    }
}

/// Tally of one section's generation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: String,
    pub outcome: SectionOutcome,
    pub generated: usize,
    pub skipped: usize,
    pub errors: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_ids: Vec<String>,
}

impl SectionSummary {
    /// Summary for a section that produced no per-entry work.
    #[must_use]
    pub fn without_entries(section: &str, outcome: SectionOutcome) -> Self {
        Self {
            section: section.to_string(),
            outcome,
            generated: 0,
            skipped: 0,
            errors: 0,
            failed_ids: Vec::new(),
        }
    }
}

/// Aggregate result of `canto generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub generated: usize,
    pub skipped: usize,
    pub errors: usize,
    pub sections: Vec<SectionSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    #[must_use]
    pub fn from_sections(
        sections: Vec<SectionSummary>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let successful = sections.iter().filter(|s| s.outcome.is_success()).count();
        Self {
            processed: sections.len(),
            successful,
            failed: sections.len() - successful,
            generated: sections.iter().map(|s| s.generated).sum(),
            skipped: sections.iter().map(|s| s.skipped).sum(),
            errors: sections.iter().map(|s| s.errors).sum(),
            sections,
            started_at,
            finished_at,
        }
    }

    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Response from `canto say`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeakResponse {
    pub output: PathBuf,
    pub bytes: usize,
    pub voice: String,
}
