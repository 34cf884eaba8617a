use std::path::PathBuf;

use anyhow::Context;
use canto_core::responses::SpeakResponse;
use canto_speech::Synthesizer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SayArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `canto say`: synthesize one text to a file.
pub async fn handle(args: &SayArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = args.text.trim();
    if text.is_empty() {
        anyhow::bail!("nothing to say: text is empty");
    }

    let client = ctx.speech_client()?;
    let spinner = Progress::spinner("Synthesizing speech...");
    let audio = match client.synthesize(text).await {
        Ok(audio) => audio,
        Err(error) => {
            spinner.finish_err("synthesis failed");
            let detail = error
                .detail()
                .map(|detail| format!(" ({detail})"))
                .unwrap_or_default();
            anyhow::bail!("speech synthesis failed: {error}{detail}");
        }
    };
    spinner.finish_clear();

    let path = PathBuf::from(&args.output);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&path, &audio)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = audio.len(), "saved audio");

    output(
        &SpeakResponse {
            output: path,
            bytes: audio.len(),
            voice: client.voice().to_string(),
        },
        flags.format,
    )
}
