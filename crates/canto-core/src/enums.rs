//! Outcome and status enums for canto.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and render the same string through `Display`, so JSON output and table
//! output agree.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SkipReason
// ---------------------------------------------------------------------------

/// Why an entry was not sent to the speech service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The entry has no characters to speak.
    EmptyText,
    /// The artifact is already on disk and force mode is off.
    AlreadyExists,
    /// An earlier entry of the same section already claimed this file stem.
    DuplicateId,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::AlreadyExists => "already_exists",
            Self::DuplicateId => "duplicate_id",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Classification of a failed generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered with a cancellation (reason code + detail).
    Cancelled,
    /// The request never produced an answer (network, timeout, config).
    Transport,
    /// Audio came back but could not be written to disk.
    Io,
    /// The entry id cannot be used as a file name.
    InvalidId,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Transport => "transport",
            Self::Io => "io",
            Self::InvalidId => "invalid_id",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntryOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one entry in a generation run.
///
/// ```text
/// pending → skipped
///         → succeeded
///         → failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum EntryOutcome {
    Skipped(SkipReason),
    Succeeded,
    Failed(FailureKind),
}

impl EntryOutcome {
    /// Whether the speech service was called for this entry.
    #[must_use]
    pub const fn was_attempted(self) -> bool {
        !matches!(self, Self::Skipped(_))
            && !matches!(self, Self::Failed(FailureKind::InvalidId))
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

// ---------------------------------------------------------------------------
// SectionState
// ---------------------------------------------------------------------------

/// Reconciliation state of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    /// Every speakable entry has an artifact.
    Complete,
    /// At least one speakable entry has no artifact.
    Missing,
    /// The section has no data file.
    NoData,
}

impl SectionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Missing => "missing",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for SectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SectionOutcome
// ---------------------------------------------------------------------------

/// How a section's generation pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOutcome {
    Completed,
    CompletedWithErrors,
    NoData,
    Empty,
    UnknownSection,
}

impl SectionOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::NoData => "no_data",
            Self::Empty => "empty",
            Self::UnknownSection => "unknown_section",
        }
    }

    /// Only a pass with zero errors counts as successful.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for SectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entry_outcome_serializes_with_reason() {
        let value = serde_json::to_value(EntryOutcome::Skipped(SkipReason::EmptyText))
            .expect("outcome should serialize");
        assert_eq!(
            value,
            serde_json::json!({"status": "skipped", "reason": "empty_text"})
        );

        let value =
            serde_json::to_value(EntryOutcome::Succeeded).expect("outcome should serialize");
        assert_eq!(value, serde_json::json!({"status": "succeeded"}));
    }

    #[test]
    fn only_service_calls_count_as_attempts() {
        assert!(EntryOutcome::Succeeded.was_attempted());
        assert!(EntryOutcome::Failed(FailureKind::Cancelled).was_attempted());
        assert!(EntryOutcome::Failed(FailureKind::Io).was_attempted());
        assert!(!EntryOutcome::Failed(FailureKind::InvalidId).was_attempted());
        assert!(!EntryOutcome::Skipped(SkipReason::AlreadyExists).was_attempted());
        assert!(!EntryOutcome::Skipped(SkipReason::DuplicateId).was_attempted());
    }

    #[test]
    fn display_matches_serde_names() {
        for state in [
            SectionState::Complete,
            SectionState::Missing,
            SectionState::NoData,
        ] {
            let json = serde_json::to_value(state).expect("state should serialize");
            assert_eq!(json, serde_json::Value::String(state.to_string()));
        }
        assert_eq!(SectionOutcome::UnknownSection.to_string(), "unknown_section");
    }

    #[test]
    fn only_completed_sections_are_successful() {
        assert!(SectionOutcome::Completed.is_success());
        assert!(!SectionOutcome::CompletedWithErrors.is_success());
        assert!(!SectionOutcome::NoData.is_success());
        assert!(!SectionOutcome::Empty.is_success());
    }
}
