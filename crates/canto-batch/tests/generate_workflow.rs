//! End-to-end generation runs against an in-memory synthesizer.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use canto_batch::{
    GenerateOptions, GenerationObserver, Generator, NoopObserver, SectionLayout, check_all,
    missing_sections,
};
use canto_config::LibraryConfig;
use canto_core::entities::Entry;
use canto_core::enums::{EntryOutcome, FailureKind, SectionOutcome, SectionState, SkipReason};
use canto_speech::{AudioBytes, CancellationReason, SynthesisError, Synthesizer};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Clone, Copy)]
enum Fail {
    Cancel,
    Transport,
}

/// Records every text it is asked to speak and answers with fake MP3 bytes.
#[derive(Default)]
struct RecordingSynthesizer {
    calls: Mutex<Vec<String>>,
    failures: HashMap<String, Fail>,
}

impl RecordingSynthesizer {
    fn failing(text: &str, fail: Fail) -> Self {
        Self {
            failures: HashMap::from([(text.to_string(), fail)]),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Synthesizer for RecordingSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioBytes, SynthesisError> {
        self.calls.lock().expect("calls lock").push(text.to_string());
        match self.failures.get(text) {
            Some(Fail::Cancel) => Err(SynthesisError::Cancelled {
                reason: CancellationReason::AuthenticationFailure,
                detail: Some("invalid subscription key".into()),
            }),
            Some(Fail::Transport) => Err(SynthesisError::Configuration("unreachable".into())),
            None => Ok(format!("ID3:{text}").into_bytes()),
        }
    }
}

#[derive(Default)]
struct CollectingObserver {
    started: Mutex<Vec<(String, usize)>>,
    outcomes: Mutex<Vec<(String, EntryOutcome)>>,
}

impl GenerationObserver for CollectingObserver {
    fn on_section_start(&self, section: &str, total: usize) {
        self.started
            .lock()
            .expect("started lock")
            .push((section.to_string(), total));
    }

    fn on_entry(&self, _section: &str, entry: &Entry, outcome: EntryOutcome) {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push((entry.id.to_string(), outcome));
    }
}

fn options(force: bool) -> GenerateOptions {
    GenerateOptions {
        force,
        throttle: Duration::ZERO,
    }
}

fn project(sections: &[(&str, &str)]) -> (TempDir, SectionLayout) {
    let temp = TempDir::new().expect("tempdir should create");
    let data = temp.path().join("data");
    std::fs::create_dir_all(&data).expect("data dir should create");
    for (section, json) in sections {
        std::fs::write(data.join(format!("{section}.json")), json).expect("data should write");
    }
    let layout = SectionLayout::new(temp.path(), &LibraryConfig::default());
    (temp, layout)
}

fn library() -> LibraryConfig {
    LibraryConfig::default()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

const ANATOMY: &str = r#"[
    {"id": "1", "english": "head", "cantonese": "tau4", "characters": "頭"},
    {"id": "2", "english": "hand", "cantonese": "sau2", "characters": "手"},
    {"id": "3", "english": "foot", "cantonese": "goek3", "characters": "腳"}
]"#;

#[tokio::test]
async fn fresh_run_generates_every_entry() {
    let (temp, layout) = project(&[("anatomy", ANATOMY)]);
    let synth = RecordingSynthesizer::default();
    let generator = Generator::new(&synth, &layout, options(false));

    let summary = generator.generate_section("anatomy", &NoopObserver).await;

    assert_eq!(summary.outcome, SectionOutcome::Completed);
    assert_eq!(summary.generated, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(synth.calls(), vec!["頭", "手", "腳"]);
    assert_eq!(
        files_in(&temp.path().join("anatomy_audio")),
        vec!["1.mp3", "2.mp3", "3.mp3"]
    );
    assert_eq!(
        std::fs::read(temp.path().join("anatomy_audio/2.mp3")).expect("artifact"),
        "ID3:手".as_bytes()
    );
}

#[tokio::test]
async fn rerun_without_force_makes_no_calls() {
    let (_temp, layout) = project(&[("anatomy", ANATOMY)]);
    let first = RecordingSynthesizer::default();
    Generator::new(&first, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    let second = RecordingSynthesizer::default();
    let summary = Generator::new(&second, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    assert!(second.calls().is_empty());
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.generated, 0);
}

#[tokio::test]
async fn force_regenerates_every_entry() {
    let (_temp, layout) = project(&[("anatomy", ANATOMY)]);
    let first = RecordingSynthesizer::default();
    Generator::new(&first, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    let second = RecordingSynthesizer::default();
    let summary = Generator::new(&second, &layout, options(true))
        .generate_section("anatomy", &NoopObserver)
        .await;

    assert_eq!(second.calls().len(), 3);
    assert_eq!(summary.generated, 3);
}

#[tokio::test]
async fn empty_text_is_skipped_without_a_call() {
    let (temp, layout) = project(&[(
        "complaints",
        r#"[{"id": "1", "characters": "痛"}, {"id": "2", "characters": "   "}, {"id": "3"}]"#,
    )]);
    let synth = RecordingSynthesizer::default();
    let observer = CollectingObserver::default();

    let summary = Generator::new(&synth, &layout, options(true))
        .generate_section("complaints", &observer)
        .await;

    assert_eq!(synth.calls(), vec!["痛"]);
    assert_eq!(summary.generated, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(files_in(&temp.path().join("complaints_audio")), vec!["1.mp3"]);
    assert_eq!(
        *observer.started.lock().expect("started lock"),
        vec![("complaints".to_string(), 3)]
    );
    assert_eq!(observer.outcomes.lock().expect("outcomes lock").len(), 3);
}

#[tokio::test]
async fn failures_are_counted_and_the_section_continues() {
    let (temp, layout) = project(&[("anatomy", ANATOMY)]);
    let synth = RecordingSynthesizer::failing("手", Fail::Cancel);

    let summary = Generator::new(&synth, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    assert_eq!(summary.outcome, SectionOutcome::CompletedWithErrors);
    assert_eq!(summary.generated, 2);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.failed_ids, vec!["2"]);
    assert_eq!(
        files_in(&temp.path().join("anatomy_audio")),
        vec!["1.mp3", "3.mp3"]
    );

    // The failed entry is the only one attempted on the next run.
    let retry = RecordingSynthesizer::default();
    Generator::new(&retry, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;
    assert_eq!(retry.calls(), vec!["手"]);
}

#[tokio::test]
async fn transport_failure_is_classified() {
    let (_temp, layout) = project(&[("anatomy", r#"[{"id": "1", "characters": "頭"}]"#)]);
    let synth = RecordingSynthesizer::failing("頭", Fail::Transport);
    let observer = CollectingObserver::default();

    Generator::new(&synth, &layout, options(false))
        .generate_section("anatomy", &observer)
        .await;

    let outcomes = observer.outcomes.lock().expect("outcomes lock").clone();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, "1");
    assert!(matches!(
        outcomes[0].1,
        EntryOutcome::Failed(FailureKind::Transport)
    ));
}

#[tokio::test]
async fn batch_continues_past_missing_and_unknown_sections() {
    let (temp, layout) = project(&[("anatomy", ANATOMY), ("allergies", "[]")]);
    let synth = RecordingSynthesizer::default();
    let generator = Generator::new(&synth, &layout, options(false));

    let batch = generator
        .run_batch(
            &["emergency", "podiatry", "anatomy", "allergies", "anatomy"],
            &library(),
            &NoopObserver,
        )
        .await;

    let outcomes: Vec<_> = batch
        .sections
        .iter()
        .map(|s| (s.section.as_str(), s.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("emergency", SectionOutcome::NoData),
            ("podiatry", SectionOutcome::UnknownSection),
            ("anatomy", SectionOutcome::Completed),
            ("allergies", SectionOutcome::Empty),
        ]
    );
    assert_eq!(batch.processed, 4);
    assert_eq!(batch.successful, 1);
    assert_eq!(batch.failed, 3);
    assert_eq!(batch.generated, 3);
    assert!(batch.finished_at >= batch.started_at);
    assert!(!temp.path().join("emergency_audio").exists());
}

#[tokio::test]
async fn check_reports_without_writing_or_calling() {
    let (temp, layout) = project(&[("anatomy", ANATOMY)]);
    let audio = temp.path().join("anatomy_audio");
    std::fs::create_dir_all(&audio).expect("audio dir should create");
    std::fs::write(audio.join("1.mp3"), b"ID3").expect("artifact should write");
    std::fs::write(audio.join("old.mp3"), b"ID3").expect("artifact should write");
    let before = files_in(temp.path());

    let statuses = check_all(&layout, &["anatomy", "emergency"]);

    assert_eq!(files_in(temp.path()), before);
    assert_eq!(files_in(&audio), vec!["1.mp3", "old.mp3"]);

    let anatomy = &statuses[0];
    assert_eq!(anatomy.current, 2);
    assert_eq!(anatomy.expected, 3);
    assert_eq!(anatomy.missing_ids, vec!["2", "3"]);
    assert_eq!(anatomy.stale_ids, vec!["old"]);
    assert_eq!(anatomy.state, SectionState::Missing);

    let emergency = &statuses[1];
    assert_eq!(emergency.state, SectionState::NoData);
    assert!(!emergency.has_audio);

    let missing: Vec<_> = missing_sections(&statuses)
        .into_iter()
        .map(|s| s.section.as_str())
        .collect();
    assert_eq!(missing, vec!["anatomy"]);
}

#[tokio::test]
async fn generation_completes_what_check_reports_missing() {
    let (_temp, layout) = project(&[("anatomy", ANATOMY)]);
    let synth = RecordingSynthesizer::default();

    Generator::new(&synth, &layout, options(false))
        .run_batch(&["anatomy"], &library(), &NoopObserver)
        .await;

    let statuses = check_all(&layout, &["anatomy"]);
    assert_eq!(statuses[0].state, SectionState::Complete);
    assert!(missing_sections(&statuses).is_empty());
}

#[tokio::test]
async fn invalid_ids_fail_without_a_call() {
    let (_temp, layout) = project(&[(
        "anatomy",
        r#"[{"id": "../escape", "characters": "頭"}, {"id": "", "characters": "手"}]"#,
    )]);
    let synth = RecordingSynthesizer::default();

    let summary = Generator::new(&synth, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    assert!(synth.calls().is_empty());
    assert_eq!(summary.errors, 2);

    let status = &check_all(&layout, &["anatomy"])[0];
    assert_eq!(status.state, SectionState::Complete);
    assert_eq!(status.missing, 0);
    assert_eq!(status.invalid_ids, vec!["../escape", ""]);
}

#[tokio::test]
async fn upper_case_artifacts_count_as_existing() {
    let (temp, layout) = project(&[("anatomy", ANATOMY)]);
    let audio = temp.path().join("anatomy_audio");
    std::fs::create_dir_all(&audio).expect("audio dir should create");
    for name in ["1.MP3", "2.MP3", "3.MP3"] {
        std::fs::write(audio.join(name), b"ID3").expect("artifact should write");
    }

    let statuses = check_all(&layout, &["anatomy"]);
    assert_eq!(statuses[0].state, SectionState::Complete);

    let synth = RecordingSynthesizer::default();
    let summary = Generator::new(&synth, &layout, options(false))
        .generate_section("anatomy", &NoopObserver)
        .await;

    assert!(synth.calls().is_empty());
    assert_eq!(summary.skipped, 3);
}

#[tokio::test]
async fn rows_without_ids_do_not_hide_the_section() {
    let (_temp, layout) = project(&[(
        "anatomy",
        r#"[{"id": "1", "characters": "頭"}, {"english": "no id", "characters": "手"}, {"id": null, "characters": null}]"#,
    )]);

    let status = &check_all(&layout, &["anatomy"])[0];
    assert_eq!(status.state, SectionState::Missing);
    assert_eq!(status.expected, 1);
    assert_eq!(status.missing_ids, vec!["1"]);
    assert_eq!(status.invalid_ids, vec![""]);

    let synth = RecordingSynthesizer::default();
    let observer = CollectingObserver::default();
    let summary = Generator::new(&synth, &layout, options(false))
        .generate_section("anatomy", &observer)
        .await;

    assert_eq!(synth.calls(), vec!["頭"]);
    assert_eq!(summary.generated, 1);
    assert_eq!(summary.errors, 1);
    let outcomes: Vec<_> = observer
        .outcomes
        .lock()
        .expect("outcomes lock")
        .iter()
        .map(|(_, outcome)| *outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![
            EntryOutcome::Succeeded,
            EntryOutcome::Failed(FailureKind::InvalidId),
            EntryOutcome::Skipped(SkipReason::EmptyText),
        ]
    );

    // Once the valid entry is spoken the section is complete, whatever the
    // unusable rows say.
    assert_eq!(check_all(&layout, &["anatomy"])[0].state, SectionState::Complete);
}

#[tokio::test]
async fn forced_run_speaks_duplicate_ids_once() {
    let (temp, layout) = project(&[(
        "anatomy",
        r#"[{"id": "1", "characters": "頭"}, {"id": 1, "characters": "頭痛"}, {"id": "2", "characters": "手"}]"#,
    )]);
    let synth = RecordingSynthesizer::default();
    let observer = CollectingObserver::default();

    let summary = Generator::new(&synth, &layout, options(true))
        .generate_section("anatomy", &observer)
        .await;

    assert_eq!(synth.calls(), vec!["頭", "手"]);
    assert_eq!(summary.generated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        observer.outcomes.lock().expect("outcomes lock")[1],
        ("1".to_string(), EntryOutcome::Skipped(SkipReason::DuplicateId))
    );
    assert_eq!(
        std::fs::read(temp.path().join("anatomy_audio/1.mp3")).expect("artifact"),
        "ID3:頭".as_bytes()
    );
}

#[tokio::test(start_paused = true)]
async fn throttle_follows_only_service_calls() {
    let (_temp, layout) = project(&[(
        "anatomy",
        r#"[{"id": "1", "characters": "頭"}, {"id": "2", "characters": ""}, {"id": "3", "characters": "腳"}]"#,
    )]);
    let synth = RecordingSynthesizer::default();
    let throttled = GenerateOptions {
        force: false,
        throttle: Duration::from_millis(100),
    };

    let started = tokio::time::Instant::now();
    let summary = Generator::new(&synth, &layout, throttled)
        .generate_section("anatomy", &NoopObserver)
        .await;
    let elapsed = started.elapsed();

    assert_eq!(summary.generated, 2);
    assert!(elapsed >= Duration::from_millis(200), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn unwritable_audio_directory_fails_entries_as_io() {
    let (temp, layout) = project(&[
        ("anatomy", ANATOMY),
        ("allergies", r#"[{"id": "1", "characters": "敏感"}]"#),
    ]);
    // A regular file where the audio directory should be.
    std::fs::write(temp.path().join("anatomy_audio"), b"not a dir").expect("file should write");
    let synth = RecordingSynthesizer::default();
    let observer = CollectingObserver::default();

    let batch = Generator::new(&synth, &layout, options(false))
        .run_batch(&["anatomy", "allergies"], &library(), &observer)
        .await;

    let anatomy = &batch.sections[0];
    assert_eq!(anatomy.outcome, SectionOutcome::CompletedWithErrors);
    assert_eq!(anatomy.errors, 3);
    assert_eq!(anatomy.failed_ids, vec!["1", "2", "3"]);
    assert!(
        observer
            .outcomes
            .lock()
            .expect("outcomes lock")
            .iter()
            .take(3)
            .all(|(_, outcome)| *outcome == EntryOutcome::Failed(FailureKind::Io))
    );

    let allergies = &batch.sections[1];
    assert_eq!(allergies.outcome, SectionOutcome::Completed);
    assert_eq!(allergies.generated, 1);
    assert_eq!(synth.calls(), vec!["頭", "手", "腳", "敏感"]);
    assert_eq!(batch.failed, 1);
}
