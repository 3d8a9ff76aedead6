//! src/bootstrap.rs
//! Resolves the logger configuration from the process environment.
//!
//! The environment name is read from `DUALLOG_ENV`, then `envTarget`, and
//! defaults to `development`. The configuration document is read from
//! `DUALLOG_CONFIG`, defaulting to `config/logConfig.json`. A missing
//! document resolves to the built-in defaults.

use std::io;
use std::path::PathBuf;

use logging::{ConfigError, ConfigLayers, DEFAULT_ENVIRONMENT, LoggerConfig};

/// Primary variable naming the active environment.
pub const ENVIRONMENT_VAR: &str = "DUALLOG_ENV";

/// Fallback variable naming the active environment.
pub const ENV_TARGET_VAR: &str = "envTarget";

/// Variable naming the configuration document.
pub const CONFIG_PATH_VAR: &str = "DUALLOG_CONFIG";

/// Configuration document used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/logConfig.json";

/// Resolves the configuration from the real process environment.
pub fn resolve_from_env() -> Result<LoggerConfig, ConfigError> {
    resolve_with(|key| std::env::var(key).ok())
}

/// Resolves the configuration using `lookup` to read variables.
pub fn resolve_with<F>(lookup: F) -> Result<LoggerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let environment = environment_name(&lookup);
    let path = config_path(&lookup);

    let layers = match ConfigLayers::from_path(&path) {
        Ok(layers) => layers,
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(
                target: "duallog::bootstrap",
                path = %path.display(),
                "no log configuration file, using defaults"
            );
            ConfigLayers::default()
        }
        Err(error) => return Err(error),
    };

    layers.resolve(&environment)
}

/// Name of the active environment.
pub fn environment_name<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [ENVIRONMENT_VAR, ENV_TARGET_VAR]
        .into_iter()
        .find_map(|key| lookup(key).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned())
}

/// Location of the configuration document.
pub fn config_path<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(CONFIG_PATH_VAR)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::Severity;
    use std::collections::HashMap;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_prefers_duallog_env() {
        let lookup = vars(&[(ENVIRONMENT_VAR, "production"), (ENV_TARGET_VAR, "staging")]);
        assert_eq!(environment_name(lookup), "production");
    }

    #[test]
    fn environment_falls_back_to_env_target_then_development() {
        assert_eq!(environment_name(vars(&[(ENV_TARGET_VAR, "staging")])), "staging");
        assert_eq!(environment_name(vars(&[(ENVIRONMENT_VAR, "")])), DEFAULT_ENVIRONMENT);
        assert_eq!(environment_name(vars(&[])), DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn config_path_defaults() {
        assert_eq!(config_path(vars(&[])), PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(
            config_path(vars(&[(CONFIG_PATH_VAR, "/etc/app/log.json")])),
            PathBuf::from("/etc/app/log.json")
        );
    }

    #[test]
    fn missing_file_resolves_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");
        let lookup = vars(&[(CONFIG_PATH_VAR, path.to_str().expect("utf-8 path"))]);
        assert_eq!(resolve_with(lookup).expect("resolve"), LoggerConfig::default());
    }

    #[test]
    fn document_is_resolved_for_environment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logConfig.json");
        fs::write(
            &path,
            r#"{
                "development": {"appName": "billing", "logLevelAtStart": "debug"},
                "production": {"logLevelAtStart": "error"}
            }"#,
        )
        .expect("write config");

        let lookup = vars(&[
            (CONFIG_PATH_VAR, path.to_str().expect("utf-8 path")),
            (ENV_TARGET_VAR, "production"),
        ]);
        let config = resolve_with(lookup).expect("resolve");
        assert_eq!(config.app_name, "billing");
        assert_eq!(config.log_level_at_start, Severity::Error);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logConfig.json");
        fs::write(&path, "{ not json").expect("write config");

        let lookup = vars(&[(CONFIG_PATH_VAR, path.to_str().expect("utf-8 path"))]);
        assert!(matches!(resolve_with(lookup), Err(ConfigError::Parse(_))));
    }
}
