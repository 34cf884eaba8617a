use std::io::{BufRead, Write};

use canto_batch::{GenerateOptions, Generator, check_all, missing_sections};
use canto_core::responses::BatchSummary;
use chrono::Utc;

use crate::cli::root_commands::GenerateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::check;
use crate::context::AppContext;
use crate::output::{output, print_rows};
use crate::progress::SectionProgress;

/// Handle `canto generate`.
pub async fn handle(args: &GenerateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.check {
        return check::handle(ctx, flags);
    }

    let library = &ctx.config.library;
    let sections = if args.all {
        library.sections.clone()
    } else if !args.sections.is_empty() {
        args.sections.clone()
    } else {
        match select_missing(ctx, args.yes)? {
            Selection::Sections(sections) => sections,
            Selection::NothingMissing => {
                if flags.format == OutputFormat::Table {
                    println!("All sections have audio files.");
                    return Ok(());
                }
                let now = Utc::now();
                return output(&BatchSummary::from_sections(Vec::new(), now, now), flags.format);
            }
            Selection::Declined => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    };

    let client = ctx.speech_client()?;
    let options = GenerateOptions {
        force: args.force,
        throttle: ctx.config.batch.throttle(),
    };
    tracing::info!(
        sections = sections.len(),
        force = options.force,
        voice = client.voice(),
        "starting generation"
    );

    let generator = Generator::new(&client, &ctx.layout, options);
    let observer = SectionProgress::default();
    let summary = generator.run_batch(&sections, library, &observer).await;

    if flags.format == OutputFormat::Table {
        print_summary(&summary);
        Ok(())
    } else {
        output(&summary, flags.format)
    }
}

enum Selection {
    Sections(Vec<String>),
    NothingMissing,
    Declined,
}

/// List the sections with missing audio and ask before generating them.
fn select_missing(ctx: &AppContext, assume_yes: bool) -> anyhow::Result<Selection> {
    let statuses = check_all(&ctx.layout, &ctx.config.library.sections);
    let missing = missing_sections(&statuses);
    if missing.is_empty() {
        return Ok(Selection::NothingMissing);
    }

    eprintln!("Sections needing audio:");
    for status in &missing {
        eprintln!(
            "  - {} ({} of {} missing)",
            status.section, status.missing, status.expected
        );
    }

    let sections = missing
        .iter()
        .map(|status| status.section.clone())
        .collect();
    if assume_yes {
        return Ok(Selection::Sections(sections));
    }

    eprint!("Continue? (y/n): ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    if is_yes(&answer) {
        Ok(Selection::Sections(sections))
    } else {
        Ok(Selection::Declined)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn print_summary(summary: &BatchSummary) {
    let headers = ["section", "outcome", "generated", "skipped", "errors"];
    let rows = summary
        .sections
        .iter()
        .map(|section| {
            vec![
                section.section.clone(),
                section.outcome.to_string(),
                section.generated.to_string(),
                section.skipped.to_string(),
                section.errors.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_rows(&headers, &rows);

    for section in summary.sections.iter().filter(|s| !s.failed_ids.is_empty()) {
        println!(
            "Failed in {}: {}",
            section.section,
            section.failed_ids.join(", ")
        );
    }

    println!();
    println!("Processed: {} sections", summary.processed);
    println!("Successful: {}", summary.successful);
    println!("Failed: {}", summary.failed);
    println!(
        "Generated: {}, Skipped: {}, Errors: {}",
        summary.generated, summary.skipped, summary.errors
    );
    if !summary.all_succeeded() {
        println!("Some sections did not complete; run `canto generate` again to retry.");
    }
}
