//! On-disk layout of a phrasebook project.

use std::path::PathBuf;

use canto_config::LibraryConfig;
use canto_core::entities::EntryId;
use canto_core::errors::CoreError;

/// Combined export written next to the per-section files.
const COMBINED_DATA_FILE: &str = "all_data.json";

/// Resolves data files, audio directories and artifact paths for sections.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    root: PathBuf,
    data_dir: PathBuf,
    audio_suffix: String,
    extension: String,
}

impl SectionLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, library: &LibraryConfig) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join(&library.data_dir),
            root,
            audio_suffix: library.audio_suffix.clone(),
            extension: library.extension.trim_start_matches('.').to_string(),
        }
    }

    /// `{data_dir}/{section}.json`
    #[must_use]
    pub fn data_file(&self, section: &str) -> PathBuf {
        self.data_dir.join(format!("{section}.json"))
    }

    /// `{data_dir}/all_data.json`
    #[must_use]
    pub fn combined_data_file(&self) -> PathBuf {
        self.data_dir.join(COMBINED_DATA_FILE)
    }

    /// `{root}/{section}_audio`
    #[must_use]
    pub fn audio_dir(&self, section: &str) -> PathBuf {
        self.root.join(format!("{section}{}", self.audio_suffix))
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `{root}/{section}_audio/{id}.mp3`
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the id is not usable as a file name.
    pub fn artifact_path(&self, section: &str, id: &EntryId) -> Result<PathBuf, CoreError> {
        let file_name = id.artifact_file_name(&self.extension)?;
        Ok(self.audio_dir(section).join(file_name))
    }
}
