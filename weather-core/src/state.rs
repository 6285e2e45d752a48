use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{city_list::CityList, error_log::ErrorLog, model::UnitSystem};

pub const DEFAULT_CITY: &str = "Helsinki";

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub units: UnitSystem,

    #[serde(default = "default_city", alias = "currentTown")]
    pub current_city: String,

    /// Most recent search last.
    #[serde(default)]
    pub history: CityList,

    #[serde(default, alias = "favouriteCities")]
    pub favourites: CityList,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            current_city: default_city(),
            history: CityList::new(),
            favourites: CityList::new(),
        }
    }
}

impl AppState {
    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
    }

    pub fn set_current_city(&mut self, city: &str) {
        self.current_city = city.to_string();
    }

    pub fn add_to_history(&mut self, city: &str) {
        self.history.add_or_promote(city);
    }

    pub fn remove_from_history(&mut self, city: &str) -> bool {
        self.history.remove(city)
    }

    pub fn add_favourite(&mut self, city: &str) {
        self.favourites.add_or_promote(city);
    }

    pub fn remove_favourite(&mut self, city: &str) -> bool {
        self.favourites.remove(city)
    }

    pub fn is_favourite(&self, city: &str) -> bool {
        self.favourites.contains(city)
    }

    pub fn is_current_city_favourite(&self) -> bool {
        self.is_favourite(&self.current_city)
    }
}

/// Loads and saves [`AppState`] as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    errors: ErrorLog,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, errors: ErrorLog) -> Self {
        Self {
            path: path.into(),
            errors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved state, or the default one if there is nothing usable on disk.
    pub fn load(&self) -> AppState {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No saved state, starting with defaults");
            return AppState::default();
        }

        match self.read() {
            Ok(state) => {
                tracing::debug!(path = %self.path.display(), "Loaded saved state");
                state
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Ignoring unreadable state file");
                AppState::default()
            }
        }
    }

    /// Persist `state`. Failures go to the error log; the return value only
    /// says whether the file was written.
    pub fn save(&self, state: &AppState) -> bool {
        match self.write(state) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "Saved application state");
                true
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to save application state");
                self.errors.record(
                    &format!("Error writing to file: {}", self.path.display()),
                    &err,
                );
                false
            }
        }
    }

    fn read(&self) -> Result<AppState> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }

    fn write(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(state).context("Failed to serialize application state")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}
