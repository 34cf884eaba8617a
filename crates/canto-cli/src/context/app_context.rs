use std::path::Path;

use anyhow::Context;
use canto_batch::SectionLayout;
use canto_config::CantoConfig;
use canto_speech::AzureSpeechClient;

/// Shared application resources resolved once at startup.
///
/// The speech client is built on demand so read-only commands work without
/// credentials.
pub struct AppContext {
    pub config: CantoConfig,
    pub layout: SectionLayout,
}

impl AppContext {
    #[must_use]
    pub fn new(project_root: &Path, config: CantoConfig) -> Self {
        let layout = SectionLayout::new(project_root, &config.library);
        Self { config, layout }
    }

    /// Build the speech client from the `speech` config section.
    pub fn speech_client(&self) -> anyhow::Result<AzureSpeechClient> {
        AzureSpeechClient::new(&self.config.speech).context("failed to initialize speech client")
    }
}
