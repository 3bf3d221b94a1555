use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// Environment variable consulted when no explicit API key is given.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key, if configured.
    pub api_key: Option<String>,

    /// Directory holding `favorites.json` and `history.csv`.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|err| {
            Error::Unexpected(format!("failed to read config file {}: {err}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|err| {
            Error::Unexpected(format!("failed to parse config file {}: {err}", path.display()))
        })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::Unexpected(format!(
                    "failed to create config directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|err| Error::Unexpected(format!("failed to serialize configuration: {err}")))?;

        fs::write(path, toml).map_err(|err| {
            Error::Unexpected(format!("failed to write config file {}: {err}", path.display()))
        })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the API key: explicit argument first, then the environment,
    /// then this config file. The client itself never reads the environment.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(key) = explicit {
            if !key.trim().is_empty() {
                return Some(key.to_string());
            }
        }
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Some(key);
            }
        }
        self.api_key.clone().filter(|key| !key.trim().is_empty())
    }

    /// Resolve where the favorites and history files live: explicit argument
    /// first, then this config file, then the platform data directory.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-dash", "weather-dash")
        .ok_or_else(|| Error::Unexpected("could not determine platform directories".to_string()))
}
