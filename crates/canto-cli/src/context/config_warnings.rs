use canto_config::{BatchConfig, CantoConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CantoConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CantoConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.speech.is_configured() && has_env_prefix(&env_keys, "CANTO_SPEECH") {
        warnings.push(
            "Speech config appears default while CANTO_SPEECH* env vars exist. Use double underscores (example: CANTO_SPEECH__KEY)."
                .to_string(),
        );
    }

    let batch_typo = env_keys
        .iter()
        .any(|key| key.starts_with("CANTO_BATCH_") && !key.starts_with("CANTO_BATCH__"));
    if batch_typo && config.batch.throttle_ms == BatchConfig::default().throttle_ms {
        warnings.push(
            "Batch config appears default while CANTO_BATCH* env vars exist. Use double underscores (example: CANTO_BATCH__THROTTLE_MS)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use canto_config::{CantoConfig, SpeechConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let config = CantoConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("CANTO_SPEECH_KEY".to_string(), "k".to_string()),
                ("CANTO_BATCH_THROTTLE_MS".to_string(), "0".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn does_not_warn_when_speech_is_configured() {
        let config = CantoConfig {
            speech: SpeechConfig {
                key: "k".to_string(),
                region: "eastasia".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("CANTO_SPEECH__KEY".to_string(), "k".to_string()),
                ("CANTO_BATCH__THROTTLE_MS".to_string(), "100".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }
}
