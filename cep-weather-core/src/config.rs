use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::ConfigError, provider::weatherapi::WEATHERAPI_BASE_URL, resolver::VIACEP_BASE_URL};

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// `[weatherapi]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// `[viacep]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViaCepConfig {
    pub base_url: Option<String>,
}

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// port = 8081
///
/// [weatherapi]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub weatherapi: WeatherApiConfig,
    #[serde(default)]
    pub viacep: ViaCepConfig,
}

/// Values supplied on the command line or through the environment. They win
/// over anything in the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    pub weatherapi_url: Option<String>,
    pub viacep_url: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub weatherapi_url: String,
    pub viacep_url: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("weatherapi_url", &self.weatherapi_url)
            .field("viacep_url", &self.viacep_url)
            .finish()
    }
}

impl Settings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load config from the default location, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: parent.display().to_string(), source })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(path, toml)
            .map_err(|source| ConfigError::Write { path: path.display().to_string(), source })
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs =
            ProjectDirs::from("dev", "cep-weather", "cep-weather").ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.weatherapi.api_key = Some(api_key);
    }

    pub fn api_key(&self) -> Option<&str> {
        self.weatherapi.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Merges overrides on top of the file values and fills in defaults.
    ///
    /// A missing or blank API key is an error: the server cannot start without one.
    pub fn resolve(&self, overrides: Overrides) -> Result<Settings, ConfigError> {
        let api_key = overrides
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key().map(str::to_owned))
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Settings {
            host: overrides
                .host
                .or_else(|| self.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(self.port).unwrap_or(DEFAULT_PORT),
            api_key,
            weatherapi_url: overrides
                .weatherapi_url
                .or_else(|| self.weatherapi.base_url.clone())
                .unwrap_or_else(|| WEATHERAPI_BASE_URL.to_string()),
            viacep_url: overrides
                .viacep_url
                .or_else(|| self.viacep.base_url.clone())
                .unwrap_or_else(|| VIACEP_BASE_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_when_api_key_missing() {
        let cfg = Config::default();
        let err = cfg.resolve(Overrides::default()).unwrap_err();

        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("WEATHER_API_KEY is required"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        let overrides = Overrides { api_key: Some(String::new()), ..Default::default() };
        assert!(matches!(cfg.resolve(overrides), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn resolve_fills_defaults() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let settings = cfg.resolve(Overrides::default()).expect("settings");

        assert_eq!(settings.api_key, "FILE_KEY");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.bind_address(), "0.0.0.0:8081");
        assert_eq!(settings.weatherapi_url, WEATHERAPI_BASE_URL);
        assert_eq!(settings.viacep_url, VIACEP_BASE_URL);
    }

    #[test]
    fn overrides_win_over_file() {
        let cfg: Config = toml::from_str(
            r#"
            port = 9000

            [weatherapi]
            api_key = "FILE_KEY"

            [viacep]
            base_url = "http://viacep.local/ws"
            "#,
        )
        .expect("valid toml");

        let settings = cfg
            .resolve(Overrides {
                port: Some(8080),
                api_key: Some("CLI_KEY".into()),
                ..Default::default()
            })
            .expect("settings");

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.api_key, "CLI_KEY");
        assert_eq!(settings.viacep_url, "http://viacep.local/ws");
    }

    #[test]
    fn saved_config_has_no_timeout_setting() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.weatherapi.base_url = Some(WEATHERAPI_BASE_URL.into());

        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        assert!(!toml.contains("timeout"), "{toml}");
    }

    #[test]
    fn stale_timeout_key_is_ignored() {
        let cfg: Config = toml::from_str(
            r#"
            [weatherapi]
            api_key = "FILE_KEY"
            timeout_secs = 5
            "#,
        )
        .expect("unknown keys are ignored");

        let settings = cfg.resolve(Overrides::default()).expect("settings");
        assert_eq!(settings.api_key, "FILE_KEY");
    }

    #[test]
    fn settings_debug_redacts_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("SECRET".into());
        let settings = cfg.resolve(Overrides::default()).expect("settings");

        assert!(!format!("{settings:?}").contains("SECRET"));
    }

    #[test]
    fn missing_file_loads_as_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("default config");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_api_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED_KEY".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key(), Some("SAVED_KEY"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    }
}
