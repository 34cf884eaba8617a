//! # canto-secrets
//!
//! External secret provider integrations for canto.
//!
//! The speech subscription key should never live in the repository. When a
//! backend is configured, secrets are fetched at startup and handed to
//! `canto-config` as `CANTO_*` overrides.

use infisical::{AuthMethod, Client, secrets::ListSecretsRequest};
use thiserror::Error;

const ENV_BACKEND: &str = "CANTO_SECRETS__BACKEND";
const ENV_INFISICAL_BASE_URL: &str = "CANTO_INFISICAL__BASE_URL";
const ENV_INFISICAL_CLIENT_ID: &str = "CANTO_INFISICAL__CLIENT_ID";
const ENV_INFISICAL_CLIENT_SECRET: &str = "CANTO_INFISICAL__CLIENT_SECRET";
const ENV_INFISICAL_PROJECT_ID: &str = "CANTO_INFISICAL__PROJECT_ID";
const ENV_INFISICAL_ENVIRONMENT: &str = "CANTO_INFISICAL__ENVIRONMENT";
const ENV_INFISICAL_PATH: &str = "CANTO_INFISICAL__PATH";

/// Bare names used by Azure samples, accepted as aliases in the secret store.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("SPEECH_KEY", "CANTO_SPEECH__KEY"),
    ("SPEECH_REGION", "CANTO_SPEECH__REGION"),
];

/// Result of resolving external secrets.
#[derive(Debug, Clone)]
pub enum SecretOverrides {
    Disabled,
    Values(Vec<(String, String)>),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Backend {
    None,
    Infisical,
}

impl Backend {
    fn from_env() -> Result<Self, SecretError> {
        let raw = std::env::var(ENV_BACKEND).unwrap_or_default();
        let normalized = raw.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "" | "none" | "off" | "disabled" => Ok(Self::None),
            "infisical" => Ok(Self::Infisical),
            value => Err(SecretError::UnsupportedBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct InfisicalSettings {
    base_url: String,
    client_id: String,
    client_secret: String,
    project_id: String,
    environment: String,
    path: String,
}

impl InfisicalSettings {
    fn from_env() -> Result<Self, SecretError> {
        Ok(Self {
            base_url: std::env::var(ENV_INFISICAL_BASE_URL)
                .unwrap_or_else(|_| "https://app.infisical.com".to_string()),
            client_id: required_env(ENV_INFISICAL_CLIENT_ID)?,
            client_secret: required_env(ENV_INFISICAL_CLIENT_SECRET)?,
            project_id: required_env(ENV_INFISICAL_PROJECT_ID)?,
            environment: required_env(ENV_INFISICAL_ENVIRONMENT)?,
            path: std::env::var(ENV_INFISICAL_PATH).unwrap_or_else(|_| "/".to_string()),
        })
    }
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("unsupported secrets backend '{0}'")]
    UnsupportedBackend(String),
    #[error("required environment variable '{name}' is missing")]
    MissingEnvVar { name: &'static str },
    #[error("infisical error: {0}")]
    Infisical(#[from] infisical::InfisicalError),
}

fn required_env(name: &'static str) -> Result<String, SecretError> {
    std::env::var(name).map_err(|_| SecretError::MissingEnvVar { name })
}

/// Load secret key/value overrides from the configured external backend.
///
/// Expected naming convention is exact config keys (e.g., `CANTO_SPEECH__KEY`);
/// the bare `SPEECH_KEY` / `SPEECH_REGION` names are accepted as aliases.
pub async fn load_env_overrides() -> Result<SecretOverrides, SecretError> {
    match Backend::from_env()? {
        Backend::None => Ok(SecretOverrides::Disabled),
        Backend::Infisical => {
            let settings = InfisicalSettings::from_env()?;
            let values = load_from_infisical(&settings).await?;
            Ok(SecretOverrides::Values(normalize_overrides(values)))
        }
    }
}

async fn load_from_infisical(
    settings: &InfisicalSettings,
) -> Result<Vec<(String, String)>, SecretError> {
    let mut client = Client::builder()
        .base_url(&settings.base_url)
        .build()
        .await?;

    client
        .login(AuthMethod::new_universal_auth(
            &settings.client_id,
            &settings.client_secret,
        ))
        .await?;

    let request = ListSecretsRequest::builder(&settings.project_id, &settings.environment)
        .path(&settings.path)
        .recursive(true)
        .expand_secret_references(true)
        .build();

    Ok(client
        .secrets()
        .list(request)
        .await?
        .into_iter()
        .map(|secret| (secret.secret_key, secret.secret_value))
        .collect())
}

/// Keep `CANTO_*` keys, rename legacy aliases, and sort by key.
///
/// An explicit `CANTO_*` key wins over its alias.
fn normalize_overrides(values: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut normalized: Vec<(String, String)> = Vec::new();

    for (key, value) in values {
        if key.starts_with("CANTO_") {
            normalized.retain(|(existing, _)| existing != &key);
            normalized.push((key, value));
        } else if let Some((_, target)) = LEGACY_ALIASES.iter().find(|(alias, _)| *alias == key)
        {
            if !normalized.iter().any(|(existing, _)| existing == target) {
                normalized.push(((*target).to_string(), value));
            }
        }
    }

    normalized.sort_by(|a, b| a.0.cmp(&b.0));
    normalized
}
