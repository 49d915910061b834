//! Configuration file management
//!
//! This module handles loading and saving the application configuration
//! file, which holds file locations and the interval timer defaults. A
//! missing file is not an error: defaults are used until the user saves.

use crate::constants::{
    APP_DIR, CONFIG_FILENAME, COUNTDOWN_DEFAULT_MINUTES, COUNTDOWN_MAX_MINUTES,
    COUNTDOWN_MIN_MINUTES, REST_DEFAULT_MINUTES, REST_MAX_MINUTES, ROUNDS_DEFAULT, ROUNDS_MAX,
    SETTINGS_FILENAME,
};
use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration stored in config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Settings store location (default: next to config.toml)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
    /// Directory that relative roster paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_dir: Option<PathBuf>,
    /// Work phase length in minutes (default: 5)
    #[serde(default = "default_countdown_minutes")]
    pub countdown_minutes: u64,
    /// Rest between rounds in minutes, 0 disables (default: 1)
    #[serde(default = "default_rest_minutes")]
    pub rest_minutes: u64,
    /// Number of work rounds (default: 1)
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

fn default_countdown_minutes() -> u64 {
    COUNTDOWN_DEFAULT_MINUTES
}

fn default_rest_minutes() -> u64 {
    REST_DEFAULT_MINUTES
}

fn default_rounds() -> u32 {
    ROUNDS_DEFAULT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_file: None,
            roster_dir: None,
            countdown_minutes: default_countdown_minutes(),
            rest_minutes: default_rest_minutes(),
            rounds: default_rounds(),
        }
    }
}

impl Config {
    /// Directory holding config.toml and, by default, settings.json
    ///
    /// - macOS: `~/Library/Application Support/teacher-toolbox`
    /// - Linux: `~/.config/teacher-toolbox`
    /// - Windows: `%APPDATA%\teacher-toolbox`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Get the standard config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILENAME)
    }

    /// Settings store path, honouring `settings_file`
    pub fn settings_path(&self) -> PathBuf {
        self.settings_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join(SETTINGS_FILENAME))
    }

    /// Resolve a roster path given on the command line
    pub fn resolve_roster(&self, path: &Path) -> PathBuf {
        match &self.roster_dir {
            Some(dir) if path.is_relative() && !path.exists() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Load config from the standard location, or defaults if absent
    pub fn load_or_default() -> Result<Self> {
        Self::load_from_path(&Self::config_path())
    }

    /// Load config from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    /// Out-of-range values are clamped with a warning instead.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate_and_clamp();
        Ok(config)
    }

    /// Save config to the standard location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        log::info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    fn validate_and_clamp(&mut self) {
        if self.countdown_minutes < COUNTDOWN_MIN_MINUTES {
            warn!(
                "countdown_minutes {} below minimum, using {}",
                self.countdown_minutes, COUNTDOWN_MIN_MINUTES
            );
            self.countdown_minutes = COUNTDOWN_MIN_MINUTES;
        } else if self.countdown_minutes > COUNTDOWN_MAX_MINUTES {
            warn!(
                "countdown_minutes {} exceeds maximum, clamping to {}",
                self.countdown_minutes, COUNTDOWN_MAX_MINUTES
            );
            self.countdown_minutes = COUNTDOWN_MAX_MINUTES;
        }

        if self.rest_minutes > REST_MAX_MINUTES {
            warn!(
                "rest_minutes {} exceeds maximum, clamping to {}",
                self.rest_minutes, REST_MAX_MINUTES
            );
            self.rest_minutes = REST_MAX_MINUTES;
        }

        if self.rounds == 0 {
            warn!("rounds must be at least 1, using 1");
            self.rounds = 1;
        } else if self.rounds > ROUNDS_MAX {
            warn!("rounds {} exceeds maximum, clamping to {}", self.rounds, ROUNDS_MAX);
            self.rounds = ROUNDS_MAX;
        }
    }
}
