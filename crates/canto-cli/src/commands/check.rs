use canto_batch::check_all;
use canto_core::enums::SectionState;
use canto_core::responses::{CheckReport, SectionStatus};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, print_rows};

/// Handle `canto check`. Reads the data and audio directories only.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = CheckReport::new(check_all(&ctx.layout, &ctx.config.library.sections));

    if flags.format != OutputFormat::Table {
        return output(&report, flags.format);
    }

    print_status_table(&report.sections);
    println!();
    for status in report.sections.iter().filter(|s| !s.invalid_ids.is_empty()) {
        println!(
            "Entries with unusable ids in {}: {}",
            status.section,
            status.invalid_ids.len()
        );
    }
    if report.missing_sections.is_empty() {
        println!("All sections have audio files.");
    } else {
        println!(
            "Sections needing audio: {}",
            report.missing_sections.join(", ")
        );
    }
    Ok(())
}

pub fn print_status_table(statuses: &[SectionStatus]) {
    let headers = [
        "section", "has_audio", "files", "expected", "missing", "stale", "status",
    ];
    let rows = statuses.iter().map(status_row).collect::<Vec<_>>();
    print_rows(&headers, &rows);
}

fn status_row(status: &SectionStatus) -> Vec<String> {
    vec![
        status.section.clone(),
        if status.has_audio { "yes" } else { "no" }.to_string(),
        status.current.to_string(),
        status.expected.to_string(),
        status.missing.to_string(),
        status.stale.to_string(),
        status_label(status),
    ]
}

fn status_label(status: &SectionStatus) -> String {
    match status.state {
        SectionState::Complete => "OK".to_string(),
        SectionState::Missing => format!("MISSING {}", status.missing),
        SectionState::NoData => "NO DATA".to_string(),
    }
}
