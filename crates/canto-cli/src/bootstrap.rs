use std::path::Path;

use anyhow::Context;
use canto_config::CantoConfig;

/// Bare names read by Azure's own samples, honored when the `CANTO_` key is absent.
const PROCESS_ENV_ALIASES: &[(&str, &str)] = &[
    ("SPEECH_KEY", "CANTO_SPEECH__KEY"),
    ("SPEECH_REGION", "CANTO_SPEECH__REGION"),
];

pub async fn load_config(project_root: &Path) -> anyhow::Result<CantoConfig> {
    load_project_dotenv(project_root)?;

    let mut env_overrides = match canto_secrets::load_env_overrides().await {
        Ok(canto_secrets::SecretOverrides::Disabled) => Vec::new(),
        Ok(canto_secrets::SecretOverrides::Values(values)) => values,
        Err(error) => {
            if is_ci() {
                return Err(anyhow::anyhow!(
                    "failed to load configured secret backend in CI: {error}"
                ));
            }

            tracing::warn!(%error, "failed to load external secrets; continuing with local config");
            Vec::new()
        }
    };
    env_overrides.extend(process_env_aliases(std::env::vars(), &env_overrides));

    CantoConfig::load_with_env_overrides(project_root, &env_overrides)
        .context("failed to load canto configuration")
}

fn is_ci() -> bool {
    std::env::var("CI")
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Alias values for keys set neither in the environment nor by the secret backend.
fn process_env_aliases<I>(env: I, overrides: &[(String, String)]) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env = env.into_iter().collect::<Vec<_>>();
    let is_set = |key: &str| {
        env.iter().any(|(name, _)| name == key) || overrides.iter().any(|(name, _)| name == key)
    };

    PROCESS_ENV_ALIASES
        .iter()
        .filter(|(_, target)| !is_set(*target))
        .filter_map(|(alias, target)| {
            env.iter()
                .find(|(name, value)| name == alias && !value.trim().is_empty())
                .map(|(_, value)| ((*target).to_string(), value.clone()))
        })
        .collect()
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::process_env_aliases;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn aliases_fill_unset_speech_keys() {
        let aliases = process_env_aliases(
            vec![pair("SPEECH_KEY", "k"), pair("SPEECH_REGION", "eastasia")],
            &[],
        );
        assert_eq!(
            aliases,
            vec![
                pair("CANTO_SPEECH__KEY", "k"),
                pair("CANTO_SPEECH__REGION", "eastasia"),
            ]
        );
    }

    #[test]
    fn explicit_keys_win_over_aliases() {
        let aliases = process_env_aliases(
            vec![
                pair("SPEECH_KEY", "alias"),
                pair("CANTO_SPEECH__KEY", "explicit"),
                pair("SPEECH_REGION", "eastasia"),
            ],
            &[pair("CANTO_SPEECH__REGION", "westus")],
        );
        assert!(aliases.is_empty());
    }
}
