//! # canto-config
//!
//! Layered configuration loading for canto using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CANTO_*` prefix, `__` as separator)
//! 2. External secret overrides (see `canto-secrets`)
//! 3. Project-level `.canto/config.toml`
//! 4. User-level `~/.config/canto/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CANTO_SPEECH__KEY` -> `speech.key`, `CANTO_BATCH__THROTTLE_MS` -> `batch.throttle_ms`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use canto_config::CantoConfig;
//!
//! let config = CantoConfig::load_with_env_overrides(std::path::Path::new("."), &[])
//!     .expect("config");
//!
//! if config.speech.is_configured() {
//!     println!("Voice: {}", config.speech.voice);
//! }
//! ```

mod batch;
mod error;
mod library;
mod speech;

pub use batch::BatchConfig;
pub use error::ConfigError;
pub use library::{DEFAULT_SECTIONS, LibraryConfig};
pub use speech::SpeechConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix shared by config keys and secret overrides.
pub const ENV_PREFIX: &str = "CANTO_";

/// Project-local config path, relative to the project root.
pub const PROJECT_CONFIG_PATH: &str = ".canto/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CantoConfig {
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl CantoConfig {
    /// Load configuration for `project_root`, layering externally resolved
    /// secrets between the TOML files and the process environment.
    ///
    /// Override keys use the environment spelling (`CANTO_SPEECH__KEY`); keys
    /// without the `CANTO_` prefix are ignored.
    pub fn load_with_env_overrides(
        project_root: &Path,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        let mut figment = Self::file_figment(project_root);

        for (name, raw) in overrides {
            let Some(path) = env_key_to_path(name) else {
                continue;
            };
            let value = Value::from_str(raw).unwrap_or_else(|_| Value::from(raw.clone()));
            // Default profile: merge order alone decides precedence against Env.
            figment = figment.merge(Serialized::default(&path, value));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make paths or requests meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.extension.trim_start_matches('.').is_empty() {
            return Err(invalid("library.extension", "must not be empty"));
        }
        if self.library.sections.iter().any(|s| s.trim().is_empty()) {
            return Err(invalid("library.sections", "section names must not be blank"));
        }
        if self
            .library
            .sections
            .iter()
            .any(|s| s.contains(['/', '\\']) || s == "..")
        {
            return Err(invalid(
                "library.sections",
                "section names must not contain path separators",
            ));
        }
        if self.speech.timeout_secs == 0 {
            return Err(invalid("speech.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// Build the figment provider chain for `project_root`.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(project_root: &Path) -> Figment {
        Self::file_figment(project_root).merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Defaults plus the user-global and project-local TOML layers.
    fn file_figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("canto").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// `CANTO_SPEECH__KEY` -> `speech.key`.
fn env_key_to_path(name: &str) -> Option<String> {
    let rest = name.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(
        rest.split("__")
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("."),
    )
}
