//! Phrasebook layout configuration.

use serde::{Deserialize, Serialize};

/// Sections of the medical phrasebook, in page order.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "introductions",
    "complaints",
    "medications",
    "allergies",
    "history_questions",
    "family_history",
    "prior_illnesses",
    "cardiology",
    "cardiovascular_illnesses",
    "anatomy",
    "emergency",
    "dermatology",
    "endocrinology",
    "gastroenterology",
];

fn default_data_dir() -> String {
    String::from("data")
}

fn default_audio_suffix() -> String {
    String::from("_audio")
}

fn default_extension() -> String {
    String::from("mp3")
}

fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory holding `{section}.json`, relative to the project root.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Suffix appended to the section name to form its audio directory.
    #[serde(default = "default_audio_suffix")]
    pub audio_suffix: String,

    /// Audio file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Known sections; the default batch and the status table cover these.
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            audio_suffix: default_audio_suffix(),
            extension: default_extension(),
            sections: default_sections(),
        }
    }
}

impl LibraryConfig {
    #[must_use]
    pub fn is_known_section(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LibraryConfig::default();
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.audio_suffix, "_audio");
        assert_eq!(config.extension, "mp3");
        assert_eq!(config.sections.len(), 14);
        assert!(config.is_known_section("dermatology"));
        assert!(!config.is_known_section("podiatry"));
    }
}
