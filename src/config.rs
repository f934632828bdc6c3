use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{colors, DEFAULT_BUNDLE_DIR, DEFAULT_COMPRESS_SUGGEST_MB};

/// Ambient settings, persisted as JSON in the home directory.
///
/// The extension-to-category table is deliberately NOT part of this: it is
/// compiled in and identical for every user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File size (MB) above which a compression advisory is printed
    pub compress_suggest_mb: u64,
    /// Directory name for organize bundles when no destination is given
    pub bundle_dir_name: String,
    /// Ask before deleting (bypassed by --yes)
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compress_suggest_mb: DEFAULT_COMPRESS_SUGGEST_MB,
            bundle_dir_name: DEFAULT_BUNDLE_DIR.to_string(),
            confirm_delete: true,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".tidykit.json"))
    }

    /// Load config from disk; defaults are used when the file is missing or
    /// unreadable (a warning is printed, the run continues).
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&config_path).context("Failed to read config file")?;
        match serde_json::from_str(&data) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "{} Config file is invalid ({}), using defaults",
                    "warning:".color(colors::WARNING),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save config to disk. Written to a temp file first and renamed into
    /// place so a crash mid-write never leaves a truncated config.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        let temp_path = config_path.with_extension("json.tmp");

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&temp_path, &data).context("Failed to write temp config")?;
        fs::rename(&temp_path, &config_path).context("Failed to finalize config")?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("{}", "CURRENT CONFIGURATION".bold().color(colors::HEADER));
        println!();
        println!(
            "{} Compression advisory threshold: {} MB",
            "•".cyan(),
            self.compress_suggest_mb
        );
        println!(
            "{} Bundle directory name: {}",
            "•".cyan(),
            self.bundle_dir_name
        );
        println!(
            "{} Confirm before delete: {}",
            "•".cyan(),
            if self.confirm_delete { "yes" } else { "no" }
        );
        if let Ok(path) = Self::config_path() {
            let status = if path.exists() { "" } else { " (not written yet)" };
            println!(
                "{} Config file: {}{}",
                "•".cyan(),
                path.display().to_string().color(colors::PATH),
                status
            );
        }
    }
}
