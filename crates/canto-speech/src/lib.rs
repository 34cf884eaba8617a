//! # canto-speech
//!
//! Text-to-speech for canto.
//!
//! The batch workflow only depends on the [`Synthesizer`] capability:
//! `synthesize(text) -> audio bytes | SynthesisError`. [`AzureSpeechClient`]
//! implements it against the Azure Cognitive Services Speech REST endpoint,
//! sending one SSML document per request and returning the encoded audio
//! stream as-is.

mod error;
mod http;
pub mod ssml;

pub use error::{CancellationReason, SynthesisError};

use std::future::Future;
use std::time::Duration;

use canto_config::SpeechConfig;

/// Encoded audio as returned by the service (MP3 by default).
pub type AudioBytes = Vec<u8>;

/// A speech synthesis capability.
///
/// Calls are awaited one at a time by the generator; implementations do not
/// need to be re-entrant.
pub trait Synthesizer {
    /// Synthesize `text` with the implementation's fixed voice configuration.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<AudioBytes, SynthesisError>> + Send;
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the Azure Speech text-to-speech REST API.
pub struct AzureSpeechClient {
    http: reqwest::Client,
    url: String,
    key: String,
    language: String,
    voice: String,
    output_format: String,
}

impl AzureSpeechClient {
    /// Build a client from the speech configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::Configuration`] when the key or the
    /// region/endpoint is missing, and [`SynthesisError::Transport`] if the
    /// underlying `reqwest::Client` fails to build.
    pub fn new(config: &SpeechConfig) -> Result<Self, SynthesisError> {
        if !config.is_configured() {
            return Err(SynthesisError::Configuration(
                "set speech.key and speech.region (CANTO_SPEECH__KEY, CANTO_SPEECH__REGION)"
                    .to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("canto/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.synthesis_url(),
            key: config.key.clone(),
            language: config.language.clone(),
            voice: config.voice.clone(),
            output_format: config.output_format.clone(),
        })
    }

    /// Voice used for every request.
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }
}

impl Synthesizer for AzureSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<AudioBytes, SynthesisError> {
        let body = ssml::build(&self.language, &self.voice, text);
        tracing::debug!(voice = %self.voice, chars = text.chars().count(), "requesting synthesis");

        let resp = self
            .http
            .post(&self.url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.output_format)
            .body(body)
            .send()
            .await?;
        let resp = http::check_response(resp).await?;

        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(SynthesisError::Cancelled {
                reason: CancellationReason::EmptyAudio,
                detail: Some("service returned an empty audio stream".to_string()),
            });
        }

        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_unconfigured_speech() {
        let err = AzureSpeechClient::new(&SpeechConfig::default())
            .err()
            .expect("client should not build without credentials");
        assert!(matches!(err, SynthesisError::Configuration(_)));
    }

    #[test]
    fn new_uses_configured_voice() {
        let config = SpeechConfig {
            key: "k".into(),
            region: "eastus".into(),
            voice: "zh-HK-HiuMaanNeural".into(),
            ..Default::default()
        };
        let client = AzureSpeechClient::new(&config).expect("client should build");
        assert_eq!(client.voice(), "zh-HK-HiuMaanNeural");
        assert_eq!(
            client.url,
            "https://eastus.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }
}
