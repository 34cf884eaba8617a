use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// Identifier of a phrasebook entry.
///
/// Export tooling writes ids as strings, older sheets used bare row numbers,
/// so both JSON strings and JSON integers are accepted. The rendered value is
/// the file stem of the entry's audio artifact. A row without an id
/// deserializes to an empty text id, which never yields a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl EntryId {
    /// Trimmed file stem for this id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the id is blank or would escape
    /// the section's audio directory.
    pub fn file_stem(&self) -> Result<String, CoreError> {
        let rendered = self.to_string();
        let stem = rendered.trim();
        if stem.is_empty() {
            return Err(CoreError::Validation("entry id is empty".to_string()));
        }
        if stem.contains(['/', '\\']) || stem == "." || stem == ".." {
            return Err(CoreError::Validation(format!(
                "entry id '{rendered}' is not a valid file name"
            )));
        }
        Ok(stem.to_string())
    }

    /// File name of the artifact for this id, e.g. `12.mp3`.
    ///
    /// # Errors
    ///
    /// Same as [`EntryId::file_stem`].
    pub fn artifact_file_name(&self, extension: &str) -> Result<String, CoreError> {
        Ok(format!("{}.{extension}", self.file_stem()?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One phrase of a phrasebook section.
///
/// Every field tolerates being absent or `null` so one malformed row cannot
/// reject the whole export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: EntryId,
    /// Cantonese characters sent to the speech service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub characters: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub english: String,
    /// Romanized pronunciation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cantonese: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub see_more: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Entry {
    #[must_use]
    pub fn new(id: impl Into<EntryId>, characters: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            characters: characters.into(),
            english: String::new(),
            cantonese: String::new(),
            see_more: String::new(),
        }
    }

    /// Whether the entry has anything to speak.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.characters.trim().is_empty()
    }
}
