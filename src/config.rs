//! Environment overrides for Teacher Toolbox
//!
//! This module handles parsing of environment variables that can optionally
//! override settings from the config file. The primary configuration source
//! is config.toml (see config_file module).
//!
//! Environment variables (all optional):
//! - TEACHER_TOOLBOX_COUNTDOWN: Override the work phase length in minutes
//! - TEACHER_TOOLBOX_SETTINGS: Override the settings store location

use crate::constants::{COUNTDOWN_MAX_MINUTES, COUNTDOWN_MIN_MINUTES};
use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

const COUNTDOWN_VAR: &str = "TEACHER_TOOLBOX_COUNTDOWN";
const SETTINGS_VAR: &str = "TEACHER_TOOLBOX_SETTINGS";

/// Parse the TEACHER_TOOLBOX_COUNTDOWN environment variable
///
/// Returns Some(minutes) if a valid length is configured (1-180 minutes)
/// Returns None if not set or invalid
pub fn parse_countdown_minutes() -> Option<u64> {
    match env::var(COUNTDOWN_VAR) {
        Ok(val) => match val.trim().parse::<u64>() {
            Ok(minutes) if (COUNTDOWN_MIN_MINUTES..=COUNTDOWN_MAX_MINUTES).contains(&minutes) => {
                info!(
                    "Countdown set via environment variable: {} minutes",
                    minutes
                );
                Some(minutes)
            }
            Ok(minutes) => {
                warn!(
                    "Invalid countdown: {} (must be {}-{} minutes). Using config file.",
                    minutes, COUNTDOWN_MIN_MINUTES, COUNTDOWN_MAX_MINUTES
                );
                None
            }
            Err(e) => {
                warn!("Failed to parse {}: {}. Using config file.", COUNTDOWN_VAR, e);
                None
            }
        },
        Err(_) => {
            debug!("{} not set.", COUNTDOWN_VAR);
            None
        }
    }
}

/// Parse the TEACHER_TOOLBOX_SETTINGS environment variable
///
/// Returns Some(path) when set to a non-empty value
pub fn parse_settings_path() -> Option<PathBuf> {
    match env::var_os(SETTINGS_VAR) {
        Some(val) if !val.is_empty() => {
            let path = PathBuf::from(val);
            info!("Settings store set via environment variable: {}", path.display());
            Some(path)
        }
        Some(_) => {
            warn!("{} is empty. Using config file.", SETTINGS_VAR);
            None
        }
        None => {
            debug!("{} not set.", SETTINGS_VAR);
            None
        }
    }
}
