use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Language, UnitSystem};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OWM_API_KEY";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// language = "de"
/// timeout_secs = 15
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Unit system used when a command does not ask for one.
    pub units: Option<UnitSystem>,

    /// Response language used when a command does not ask for one.
    pub language: Option<Language>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Alternative API host, mostly for testing against a proxy.
    pub base_url: Option<String>,
}

impl Config {
    /// Reads the file at [`Config::config_file_path`]; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::read_from(&Self::config_file_path()?)
    }

    /// Writes the file at [`Config::config_file_path`].
    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::config_file_path()?)
    }

    /// `config.toml` under the platform config directory for `owm`.
    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("org", "openweathermap", "owm")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or_else(|| anyhow!("no home directory to keep owm settings in"))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("reading settings from {}", path.display())),
        };

        Self::from_toml(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let rendered = toml::to_string_pretty(self).context("encoding settings as TOML")?;

        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = dir {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(path, rendered).with_context(|| format!("writing settings to {}", path.display()))?;

        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn units_or_default(&self) -> UnitSystem {
        self.units.unwrap_or_default()
    }
}
