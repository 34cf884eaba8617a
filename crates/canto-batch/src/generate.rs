//! Sequential audio generation.
//!
//! Each entry goes `pending -> skipped | succeeded | failed` exactly once per
//! run. Entries are processed one at a time: the synthesis request is awaited,
//! the artifact written, then the throttle delay observed before the next
//! request. Existence is decided from the same listing `canto check` uses, so
//! the two commands never disagree about which artifacts are present. Nothing
//! is retried; a later run without `force` picks up whatever is still missing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use canto_config::LibraryConfig;
use canto_core::entities::Entry;
use canto_core::enums::{EntryOutcome, FailureKind, SectionOutcome, SkipReason};
use canto_core::responses::{BatchSummary, SectionSummary};
use canto_speech::{SynthesisError, Synthesizer};
use chrono::Utc;

use crate::layout::SectionLayout;
use crate::loader::{LoadError, load_section};
use crate::reconcile::{AudioListing, list_artifacts};

/// Suffix of the temporary file an artifact is written to before the rename.
const PARTIAL_SUFFIX: &str = "part";

/// Receives progress events from the generator.
///
/// All methods default to no-ops.
pub trait GenerationObserver {
    /// A section's data loaded; `total` entries will be reported.
    fn on_section_start(&self, _section: &str, _total: usize) {}

    fn on_entry(&self, _section: &str, _entry: &Entry, _outcome: EntryOutcome) {}

    fn on_section_finish(&self, _summary: &SectionSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Regenerate artifacts that already exist.
    pub force: bool,
    /// Pause after every synthesis call.
    pub throttle: Duration,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            force: false,
            throttle: Duration::from_millis(100),
        }
    }
}

/// Drives a [`Synthesizer`] over the sections of a phrasebook.
pub struct Generator<'a, S> {
    synthesizer: &'a S,
    layout: &'a SectionLayout,
    options: GenerateOptions,
}

impl<'a, S: Synthesizer> Generator<'a, S> {
    #[must_use]
    pub const fn new(synthesizer: &'a S, layout: &'a SectionLayout, options: GenerateOptions) -> Self {
        Self {
            synthesizer,
            layout,
            options,
        }
    }

    /// Bring one entry to a terminal outcome.
    ///
    /// `existing` is the section's audio listing; an entry whose stem is in it
    /// is skipped unless force mode is on. The throttle is not applied here.
    pub async fn generate_entry(
        &self,
        section: &str,
        entry: &Entry,
        existing: &AudioListing,
    ) -> EntryOutcome {
        if !entry.has_text() {
            tracing::info!(section, id = %entry.id, "skipping entry with no text");
            return EntryOutcome::Skipped(SkipReason::EmptyText);
        }

        let path = match self.layout.artifact_path(section, &entry.id) {
            Ok(path) => path,
            Err(error) => {
                tracing::warn!(section, id = %entry.id, %error, "entry id is not usable");
                return EntryOutcome::Failed(FailureKind::InvalidId);
            }
        };

        if !self.options.force
            && entry
                .id
                .file_stem()
                .is_ok_and(|stem| existing.stems.contains(&stem))
        {
            tracing::info!(section, id = %entry.id, "audio already exists");
            return EntryOutcome::Skipped(SkipReason::AlreadyExists);
        }

        match self.synthesizer.synthesize(&entry.characters).await {
            Ok(audio) => match write_artifact(&path, &audio).await {
                Ok(()) => {
                    tracing::info!(
                        section,
                        id = %entry.id,
                        bytes = audio.len(),
                        path = %path.display(),
                        "generated audio"
                    );
                    EntryOutcome::Succeeded
                }
                Err(error) => {
                    tracing::warn!(section, id = %entry.id, path = %path.display(), %error, "failed to write audio");
                    EntryOutcome::Failed(FailureKind::Io)
                }
            },
            Err(error) => {
                tracing::warn!(
                    section,
                    id = %entry.id,
                    %error,
                    detail = error.detail().unwrap_or(""),
                    "speech synthesis failed"
                );
                EntryOutcome::Failed(classify(&error))
            }
        }
    }

    /// Generate every entry of `section`.
    ///
    /// A section without data is reported as `no_data` and never touches the
    /// audio directory.
    pub async fn generate_section<O>(&self, section: &str, observer: &O) -> SectionSummary
    where
        O: GenerationObserver + ?Sized,
    {
        let entries = match load_section(self.layout, section) {
            Ok(entries) => entries,
            Err(LoadError::NotFound { path, .. }) => {
                tracing::warn!(section, path = %path.display(), "data file not found, skipping section");
                return finish(
                    observer,
                    SectionSummary::without_entries(section, SectionOutcome::NoData),
                );
            }
            Err(error) => {
                tracing::warn!(section, %error, "failed to load section data, skipping section");
                return finish(
                    observer,
                    SectionSummary::without_entries(section, SectionOutcome::NoData),
                );
            }
        };

        observer.on_section_start(section, entries.len());
        if entries.is_empty() {
            tracing::info!(section, "section has no entries");
            return finish(
                observer,
                SectionSummary::without_entries(section, SectionOutcome::Empty),
            );
        }

        let audio_dir = self.layout.audio_dir(section);
        let existing = match list_artifacts(&audio_dir, self.layout.extension()) {
            Ok(listing) => listing,
            Err(error) => {
                tracing::warn!(section, dir = %audio_dir.display(), %error, "failed to list audio directory");
                AudioListing::default()
            }
        };
        if let Err(error) = tokio::fs::create_dir_all(&audio_dir).await {
            tracing::warn!(section, dir = %audio_dir.display(), %error, "failed to create audio directory");
        }

        let mut summary = SectionSummary::without_entries(section, SectionOutcome::Completed);
        let mut claimed = HashSet::new();
        for entry in &entries {
            let duplicate = entry.has_text()
                && entry
                    .id
                    .file_stem()
                    .is_ok_and(|stem| !claimed.insert(stem));
            let outcome = if duplicate {
                tracing::warn!(section, id = %entry.id, "duplicate entry id, keeping the first");
                EntryOutcome::Skipped(SkipReason::DuplicateId)
            } else {
                self.generate_entry(section, entry, &existing).await
            };

            if outcome.was_attempted() && !self.options.throttle.is_zero() {
                tokio::time::sleep(self.options.throttle).await;
            }

            match outcome {
                EntryOutcome::Succeeded => summary.generated += 1,
                EntryOutcome::Skipped(_) => summary.skipped += 1,
                EntryOutcome::Failed(_) => {
                    summary.errors += 1;
                    summary.failed_ids.push(entry.id.to_string());
                }
            }
            observer.on_entry(section, entry, outcome);
        }

        if summary.errors > 0 {
            summary.outcome = SectionOutcome::CompletedWithErrors;
        }
        tracing::info!(
            section,
            generated = summary.generated,
            skipped = summary.skipped,
            errors = summary.errors,
            "section finished"
        );
        finish(observer, summary)
    }

    /// Generate each requested section in order.
    ///
    /// Names outside the library's catalog are reported as `unknown_section`
    /// and count as failed; repeated names are processed once.
    pub async fn run_batch<T, O>(
        &self,
        sections: &[T],
        library: &LibraryConfig,
        observer: &O,
    ) -> BatchSummary
    where
        T: AsRef<str>,
        O: GenerationObserver + ?Sized,
    {
        let started_at = Utc::now();
        let mut seen = HashSet::new();
        let mut summaries = Vec::with_capacity(sections.len());

        for section in sections.iter().map(AsRef::as_ref) {
            if !seen.insert(section) {
                continue;
            }
            if !library.is_known_section(section) {
                tracing::warn!(section, "unknown section, skipping");
                summaries.push(finish(
                    observer,
                    SectionSummary::without_entries(section, SectionOutcome::UnknownSection),
                ));
                continue;
            }
            summaries.push(self.generate_section(section, observer).await);
        }

        let batch = BatchSummary::from_sections(summaries, started_at, Utc::now());
        tracing::info!(
            processed = batch.processed,
            successful = batch.successful,
            failed = batch.failed,
            "batch finished"
        );
        batch
    }
}

fn finish<O>(observer: &O, summary: SectionSummary) -> SectionSummary
where
    O: GenerationObserver + ?Sized,
{
    observer.on_section_finish(&summary);
    summary
}

const fn classify(error: &SynthesisError) -> FailureKind {
    match error {
        SynthesisError::Cancelled { .. } => FailureKind::Cancelled,
        SynthesisError::Transport(_) | SynthesisError::Configuration(_) => FailureKind::Transport,
    }
}

/// Write `audio` to `{path}.part`, then rename it into place.
async fn write_artifact(path: &Path, audio: &[u8]) -> std::io::Result<()> {
    let partial = partial_path(path);
    if let Err(error) = tokio::fs::write(&partial, audio).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(error);
    }
    tokio::fs::rename(&partial, path).await
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
