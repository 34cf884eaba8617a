use std::sync::{Mutex, OnceLock};

use canto_batch::GenerationObserver;
use canto_core::entities::Entry;
use canto_core::enums::EntryOutcome;
use canto_core::responses::SectionSummary;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

fn bar_template() -> &'static str {
    match ui::prefs().term_width {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new_spinner());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// One progress bar per section, driven by generator events.
#[derive(Default)]
pub struct SectionProgress {
    current: Mutex<Option<Progress>>,
}

impl SectionProgress {
    fn with_current(&self, f: impl FnOnce(&mut Option<Progress>)) {
        if let Ok(mut current) = self.current.lock() {
            f(&mut *current);
        }
    }
}

impl GenerationObserver for SectionProgress {
    fn on_section_start(&self, section: &str, total: usize) {
        self.with_current(|current| {
            *current = Some(Progress::bar(total as u64, section));
        });
    }

    fn on_entry(&self, section: &str, entry: &Entry, outcome: EntryOutcome) {
        self.with_current(|current| {
            if let Some(progress) = current.as_ref() {
                progress.set_message(&format!("{section} #{} {outcome}", entry.id));
                progress.inc(1);
            }
        });
    }

    fn on_section_finish(&self, summary: &SectionSummary) {
        self.with_current(|current| {
            let Some(progress) = current.take() else {
                return;
            };
            let message = format!(
                "{}: generated {}, skipped {}, errors {}",
                summary.section, summary.generated, summary.skipped, summary.errors
            );
            if summary.errors > 0 {
                progress.finish_err(&message);
            } else {
                progress.finish_ok(&message);
            }
        });
    }
}
