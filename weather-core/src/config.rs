use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Coordinates, scheduler::MIN_REFRESH_INTERVAL};

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "WEATHER_API_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_SEARCH_CITY: &str = "Delhi";

/// How the device position is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// No geolocation capability; the refresh cycle never starts.
    Disabled,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5/"
/// refresh_interval_secs = 600
///
/// [fallback]
/// latitude = 28.67
/// longitude = 77.22
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub refresh_interval_secs: u64,
    /// City looked up once when the search panel opens; empty skips the lookup.
    pub initial_search_city: String,
    pub geolocation: GeolocationMode,
    /// Position used when geolocation is denied or fails.
    pub fallback: Coordinates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            initial_search_city: DEFAULT_SEARCH_CITY.to_string(),
            geolocation: GeolocationMode::default(),
            fallback: Coordinates::FALLBACK,
        }
    }
}

impl Config {
    /// Load config from disk (empty default on first run), then apply
    /// overrides from the process environment.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay `WEATHER_API_KEY` / `WEATHER_API_BASE_URL`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.base_url = url;
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: set {API_KEY_ENV} or run `weather configure` and enter your API key."
            )
        })
    }

    pub fn initial_search_city(&self) -> Option<&str> {
        Some(self.initial_search_city.trim()).filter(|city| !city.is_empty())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_INTERVAL.as_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_widget_behavior() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.refresh_interval(), Duration::from_millis(600_000));
        assert_eq!(cfg.fallback, Coordinates::FALLBACK);
        assert_eq!(cfg.initial_search_city(), Some("Delhi"));
        assert_eq!(cfg.geolocation, GeolocationMode::Ip);
    }

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: set WEATHER_API_KEY"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        cfg.apply_env(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (BASE_URL_ENV, "http://localhost:9000/"),
        ]));

        assert_eq!(cfg.api_key().expect("key must exist"), "ENV_KEY");
        assert_eq!(cfg.base_url, "http://localhost:9000/");
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        cfg.apply_env(env(&[(API_KEY_ENV, "  "), (BASE_URL_ENV, "")]));

        assert_eq!(cfg.api_key().expect("key must exist"), "FILE_KEY");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            refresh_interval_secs: 30,
            fallback: Coordinates::new(51.5, -0.12),
            geolocation: GeolocationMode::Disabled,
            ..Config::default()
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("KEY"));
        assert_eq!(loaded.refresh_interval_secs, 30);
        assert_eq!(loaded.fallback, Coordinates::new(51.5, -0.12));
        assert_eq!(loaded.geolocation, GeolocationMode::Disabled);
    }

    #[test]
    fn empty_initial_search_city_survives_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let cfg = Config { initial_search_city: String::new(), ..Config::default() };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.initial_search_city, "");
        assert_eq!(loaded.initial_search_city(), None);
    }

    #[test]
    fn blank_initial_search_city_is_skipped() {
        let cfg = Config { initial_search_city: "   ".into(), ..Config::default() };
        assert_eq!(cfg.initial_search_city(), None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"ABC\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.api_key.as_deref(), Some("ABC"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(cfg.initial_search_city(), Some(DEFAULT_SEARCH_CITY));
    }
}
