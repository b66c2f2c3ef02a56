use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{Coordinates, DEFAULT_ICON_BASE_URL};

pub const API_KEY_ENV: &str = "TEMPO_API_KEY";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HG Brasil API key, sent as `key` on every weather request.
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_municipalities_url")]
    pub municipalities_url: String,

    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Request timeout; `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,

    /// Pre-filled in the interactive search prompt, e.g. "Recife".
    pub default_city: Option<String>,

    /// Example TOML:
    /// [location]
    /// latitude = -8.05
    /// longitude = -34.9
    pub location: Option<Coordinates>,
}

fn default_base_url() -> String {
    "https://api.hgbrasil.com".to_string()
}

fn default_municipalities_url() -> String {
    "https://servicodados.ibge.gov.br/api/v1/localidades/municipios".to_string()
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            municipalities_url: default_municipalities_url(),
            icon_base_url: default_icon_base_url(),
            timeout_secs: None,
            default_city: None,
            location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tempo", "tempo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key, or an error telling the user how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `tempo configure` or set {API_KEY_ENV}."
            )
        })
    }

    /// Let the environment override the API key stored on disk.
    pub fn apply_env(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("tempo configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn set_api_key_is_returned() {
        let mut cfg = Config::default();
        cfg.set_api_key("f814685d".into());

        assert_eq!(cfg.require_api_key().expect("key must exist"), "f814685d");
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_api_key_override(None);
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));

        cfg.apply_api_key_override(Some(String::new()));
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));

        cfg.apply_api_key_override(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("api_key = \"abc\"\n").expect("valid toml");

        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.base_url, "https://api.hgbrasil.com");
        assert_eq!(cfg.icon_base_url, DEFAULT_ICON_BASE_URL);
        assert!(cfg.location.is_none());
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn location_table_is_parsed() {
        let cfg: Config = toml::from_str(
            "default_city = \"Recife\"\n\
             [location]\n\
             latitude = -8.05\n\
             longitude = -34.9\n",
        )
        .expect("valid toml");

        assert_eq!(cfg.default_city.as_deref(), Some("Recife"));
        assert_eq!(cfg.location, Some(Coordinates::new(-8.05, -34.9)));
    }

    #[test]
    fn save_and_load_roundtrip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.timeout_secs = Some(10);
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_from_invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
