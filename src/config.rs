// Configuration - JSON file with serde-supplied defaults
//
// A missing config file or a partial one is fine: every field has a
// default, so users only write the keys they want to override.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language code for the message catalog ("en", "de", ...).
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// SQLite database file.
    pub database: PathBuf,

    /// Directory holding one subdirectory of JSON tables per language.
    pub i18n_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            general: GeneralConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            language: "en".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            database: PathBuf::from("gearshed.sqlite"),
            i18n_dir: PathBuf::from("i18n"),
        }
    }
}

impl Config {
    /// Load from `config_dir/config.json`, falling back to defaults when the
    /// file does not exist. Keys missing from the file keep their defaults.
    pub fn load(config_dir: &Path) -> Result<Config> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Write the current settings to `config_dir/config.json`.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("failed to create config dir {}", config_dir.display()))?;
        let path = config_dir.join(CONFIG_FILE);
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(&path, raw)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.general.language, "en");
        assert_eq!(config.paths.database, PathBuf::from("gearshed.sqlite"));
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"general": {"language": "de"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.general.language, "de");
        assert_eq!(config.paths.i18n_dir, PathBuf::from("i18n"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.general.language = "de".to_string();
        config.paths.database = PathBuf::from("/tmp/shed.sqlite");
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
