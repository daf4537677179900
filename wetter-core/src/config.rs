use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_LANGUAGE: &str = "de";
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Open-Meteo serves at most 16 forecast days.
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "de"
/// timezone = "Europe/Berlin"
/// forecast_days = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Language of the canonical place names returned by the geocoder.
    #[serde(default = "default_language")]
    pub language: String,

    /// Timezone the daily aggregates are computed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Number of forecast days; the service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_days: Option<u8>,

    /// Request timeout in seconds; no timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_geocoding_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            language: default_language(),
            timezone: default_timezone(),
            forecast_days: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

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
        let dirs = ProjectDirs::from("dev", "wetter", "wetter-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The explicitly given path, else the platform default.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path),
            None => Self::config_file_path(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("geocoding_url", &self.geocoding_url),
            ("forecast_url", &self.forecast_url),
        ] {
            url::Url::parse(value).with_context(|| format!("{key} is not a valid URL: {value}"))?;
        }

        if self.language.trim().is_empty() {
            bail!("language must not be empty");
        }
        if self.timezone.trim().is_empty() {
            bail!("timezone must not be empty");
        }

        if let Some(days) = self.forecast_days {
            if !(1..=MAX_FORECAST_DAYS).contains(&days) {
                bail!("forecast_days must be between 1 and {MAX_FORECAST_DAYS}, got {days}");
            }
        }

        if self.timeout_secs == Some(0) {
            bail!("timeout_secs must be positive");
        }

        Ok(())
    }
}
