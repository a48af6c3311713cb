//! Configuration for Skycast
//!
//! Service endpoints and credentials live in a TOML file under the XDG config
//! directory (`~/.config/skycast/config.toml` on Linux). Credentials can also
//! come from the environment (or a `.env` file), which takes precedence.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::geolocation::IP_LOOKUP_URL;
use crate::data::geonames::GEONAMES_BASE_URL;
use crate::data::weather::{DEFAULT_FORECAST_DAYS, WEATHER_API_BASE_URL};

/// Environment variable overriding `weather.api_key`
pub const WEATHER_API_KEY_ENV: &str = "SKYCAST_WEATHER_API_KEY";
/// Environment variable overriding `geocoding.username`
pub const GEONAMES_USERNAME_ENV: &str = "SKYCAST_GEONAMES_USERNAME";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub geocoding: GeocodingConfig,
    pub geolocation: GeolocationConfig,
}

/// Weather service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
    /// Days requested from the service, today included
    pub forecast_days: u8,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: WEATHER_API_BASE_URL.to_string(),
            api_key: String::new(),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }
}

/// Reverse geocoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub username: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: GEONAMES_BASE_URL.to_string(),
            username: String::new(),
        }
    }
}

/// Device position settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    /// When false, startup geolocation behaves as if permission was denied
    pub enabled: bool,
    pub ip_lookup_url: String,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ip_lookup_url: IP_LOOKUP_URL.to_string(),
        }
    }
}

impl Config {
    /// Default config file location, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "skycast").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise. Environment
    /// credentials are applied on top, then the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        if config.weather.api_key.is_empty() {
            tracing::warn!(
                "no weather API key configured; set {} or weather.api_key",
                WEATHER_API_KEY_ENV
            );
        }

        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Replace credentials with non-empty values from `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(WEATHER_API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.weather.api_key = key;
        }
        if let Some(username) = lookup(GEONAMES_USERNAME_ENV).filter(|v| !v.is_empty()) {
            self.geocoding.username = username;
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Today is dropped from the forecast, so at least two days are needed
        if !(2..=14).contains(&self.weather.forecast_days) {
            return Err(ConfigError::Invalid(format!(
                "weather.forecast_days must be between 2 and 14, got {}",
                self.weather.forecast_days
            )));
        }
        if self.weather.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "weather.base_url must not be empty".to_string(),
            ));
        }
        if self.geocoding.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "geocoding.base_url must not be empty".to_string(),
            ));
        }
        if self.geolocation.enabled && self.geolocation.ip_lookup_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "geolocation.ip_lookup_url must not be empty when geolocation is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.weather.base_url, "https://api.weatherapi.com/v1");
        assert_eq!(config.weather.forecast_days, 7);
        assert!(config.weather.api_key.is_empty());
        assert_eq!(config.geocoding.base_url, "http://api.geonames.org");
        assert!(config.geolocation.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [weather]
            api_key = "abc123"

            [geolocation]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.weather.api_key, "abc123");
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.weather.base_url, "https://api.weatherapi.com/v1");
        assert!(!config.geolocation.enabled);
        assert_eq!(config.geolocation.ip_lookup_url, "http://ip-api.com/json");
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml_str("[weather\napi_key = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_credentials() {
        let env: HashMap<&str, &str> = [
            (WEATHER_API_KEY_ENV, "from-env"),
            (GEONAMES_USERNAME_ENV, "env-user"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.weather.api_key = "from-file".to_string();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.weather.api_key, "from-env");
        assert_eq!(config.geocoding.username, "env-user");
    }

    #[test]
    fn test_empty_env_value_does_not_override() {
        let mut config = Config::default();
        config.weather.api_key = "from-file".to_string();
        config.apply_env_overrides(|_| Some(String::new()));

        assert_eq!(config.weather.api_key, "from-file");
    }

    #[test]
    fn test_validate_forecast_days_range() {
        let mut config = Config::default();

        config.weather.forecast_days = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.weather.forecast_days = 15;
        assert!(config.validate().is_err());

        config.weather.forecast_days = 2;
        assert!(config.validate().is_ok());

        config.weather.forecast_days = 14;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.weather.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[weather]\nforecast_days = 5\n\n[geocoding]\nusername = \"demo\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.weather.forecast_days, 5);
        assert_eq!(config.geocoding.username, "demo");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[weather]\nforecast_days = 1\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut config = Config::default();
        config.geocoding.username = "demo".to_string();

        let text = toml::to_string(&config).unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
