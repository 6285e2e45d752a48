use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{error_log::ErrorLog, state::StateStore};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const STATE_FILE_NAME: &str = "appstate.json";
const ERRORS_DIR_NAME: &str = "errors";

/// OpenWeatherMap endpoint URLs. Overridable for proxies and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub daily: String,
    pub hourly: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: "http://api.openweathermap.org/geo/1.0/direct".to_string(),
            daily: "http://api.openweathermap.org/data/2.5/forecast/daily".to_string(),
            hourly: "https://pro.openweathermap.org/data/2.5/forecast/hourly".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// request_timeout_secs = 10
///
/// [endpoints]
/// hourly = "https://pro.openweathermap.org/data/2.5/forecast/hourly"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    pub request_timeout_secs: Option<u64>,

    /// Where the application state is kept; defaults to the data directory.
    pub state_file: Option<PathBuf>,

    /// Where error reports are written; defaults to `errors/` beside the state file.
    pub errors_dir: Option<PathBuf>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Effective configuration: the stored file with `OPENWEATHER_API_KEY`
    /// taking precedence over the stored key.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.apply_api_key_override(&key);
        }

        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn apply_api_key_override(&mut self, key: &str) {
        if !key.trim().is_empty() {
            self.set_api_key(key.to_string());
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn endpoints(&self) -> Endpoints {
        self.endpoints.clone()
    }

    pub fn state_file_path(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(STATE_FILE_NAME)),
        }
    }

    pub fn errors_dir_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.errors_dir {
            return Ok(dir.clone());
        }

        let state_file = self.state_file_path()?;
        let base = state_file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        Ok(base.join(ERRORS_DIR_NAME))
    }

    pub fn error_log(&self) -> Result<ErrorLog> {
        Ok(ErrorLog::new(self.errors_dir_path()?))
    }

    pub fn state_store(&self) -> Result<StateStore> {
        Ok(StateStore::new(self.state_file_path()?, self.error_log()?))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-viewer", "weather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
