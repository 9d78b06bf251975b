use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{model::Reading, source::SourceId};

fn default_latency_ms() -> u64 {
    1000
}

/// Settings shared by the mock sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Simulated lookup latency.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Seed for the random source; absent means a fresh sequence every run.
    pub seed: Option<u64>,

    /// Reading served by the fixed source.
    pub fixture: Option<Reading>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { latency_ms: default_latency_ms(), seed: None, fixture: None }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default source id, e.g. "random" or "fixed".
    pub default_source: Option<String>,

    /// Example TOML:
    /// [mock]
    /// latency_ms = 1000
    /// seed = 42
    #[serde(default)]
    pub mock: MockConfig,
}

impl Config {
    /// Return the default source as a strongly-typed SourceId; `random` when unset.
    pub fn default_source_id(&self) -> Result<SourceId> {
        match self.default_source.as_deref() {
            Some(s) => SourceId::try_from(s).context(
                "Invalid default source in config.\n\
                 Hint: run `weather configure <source>` (e.g. `weather configure random`).",
            ),
            None => Ok(SourceId::Random),
        }
    }

    /// Store default source as string.
    pub fn set_default_source(&mut self, id: SourceId) {
        self.default_source = Some(id.as_str().to_string());
    }

    pub fn fixture(&self) -> Option<Reading> {
        self.mock.fixture
    }

    pub fn set_fixture(&mut self, reading: Reading) {
        self.mock.fixture = Some(reading);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-presenter", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
