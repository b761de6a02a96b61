//! Matcher configuration loading.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use college_match::MatcherConfig;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "COLLEGE_MATCH_CONFIG";

/// Pick the configuration file: the explicit flag first, then the environment.
pub fn config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|value| !value.is_empty()).map(PathBuf::from))
}

/// Load and validate the matcher configuration, falling back to defaults.
pub fn load_matcher_config(explicit: Option<&Path>) -> Result<MatcherConfig> {
    match config_path(explicit, std::env::var_os(CONFIG_ENV_VAR)) {
        Some(path) => read_matcher_config(&path),
        None => Ok(MatcherConfig::default()),
    }
}

/// Parse a TOML configuration file. Missing keys keep their defaults.
pub fn read_matcher_config(path: &Path) -> Result<MatcherConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: MatcherConfig =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "loaded matcher configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_over_environment() {
        let path = config_path(
            Some(Path::new("cli.toml")),
            Some(OsString::from("env.toml")),
        );
        assert_eq!(path, Some(PathBuf::from("cli.toml")));
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        assert_eq!(config_path(None, Some(OsString::new())), None);
        assert_eq!(
            config_path(None, Some(OsString::from("env.toml"))),
            Some(PathBuf::from("env.toml"))
        );
    }
}
