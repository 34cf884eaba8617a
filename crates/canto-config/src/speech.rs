//! Azure Speech service configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    String::from("zh-HK")
}

fn default_voice() -> String {
    String::from("zh-HK-HiuGaaiNeural")
}

/// 16 kHz mono MP3 at 32 kbit/s.
fn default_output_format() -> String {
    String::from("audio-16khz-32kbitrate-mono-mp3")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Speech resource subscription key.
    #[serde(default)]
    pub key: String,

    /// Azure region of the speech resource (e.g., `eastus`).
    #[serde(default)]
    pub region: String,

    /// Full synthesis endpoint; overrides the region-derived URL when set.
    #[serde(default)]
    pub endpoint: String,

    /// Synthesis locale.
    #[serde(default = "default_language")]
    pub language: String,

    /// Neural voice name.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Value of the `X-Microsoft-OutputFormat` header.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            region: String::new(),
            endpoint: String::new(),
            language: default_language(),
            voice: default_voice(),
            output_format: default_output_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SpeechConfig {
    /// Check if the speech config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && (!self.region.is_empty() || !self.endpoint.is_empty())
    }

    /// Synthesis URL: the explicit endpoint, else the regional REST endpoint.
    #[must_use]
    pub fn synthesis_url(&self) -> String {
        if self.endpoint.is_empty() {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.region
            )
        } else {
            self.endpoint.clone()
        }
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .field("voice", &self.voice)
            .field("output_format", &self.output_format)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = SpeechConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.language, "zh-HK");
        assert_eq!(config.voice, "zh-HK-HiuGaaiNeural");
        assert_eq!(config.output_format, "audio-16khz-32kbitrate-mono-mp3");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn configured_with_key_and_region() {
        let config = SpeechConfig {
            key: "abc".into(),
            region: "eastus".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(
            config.synthesis_url(),
            "https://eastus.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn endpoint_replaces_region() {
        let config = SpeechConfig {
            key: "abc".into(),
            endpoint: "http://localhost:8080/tts".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(config.synthesis_url(), "http://localhost:8080/tts");
    }

    #[test]
    fn not_configured_without_key() {
        let config = SpeechConfig {
            region: "eastus".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = SpeechConfig {
            key: "super-secret".into(),
            region: "eastus".into(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
