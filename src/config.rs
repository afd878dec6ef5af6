//! Application configuration management.
//!
//! Settings come from four layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A JSON config file (`--config FILE`, or `config.json` in the platform
//!    config directory)
//! 3. Environment variables (`DUPEFINDER_IO_THREADS`, `DUPEFINDER_NO_PROGRESS`)
//! 4. Command-line flags
//!
//! Layers 3 and 4 are both handled by clap, so this module only merges the
//! file with the parsed [`Cli`].

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::duplicates::DEFAULT_IO_THREADS;

/// Contents of the JSON config file.
///
/// ```json
/// { "io_threads": 8, "progress": false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of hashing threads.
    #[serde(default)]
    pub io_threads: Option<usize>,
    /// Whether progress bars are drawn.
    #[serde(default)]
    pub progress: Option<bool>,
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load the configuration from an explicitly named file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `explicit` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// Only an explicitly named file can fail to load.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupefinder", "dupefinder")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Hashing threads, at least 1.
    pub io_threads: usize,
    /// Whether progress bars are drawn.
    pub show_progress: bool,
}

impl Settings {
    /// Merge the config file with command-line (and environment) values.
    #[must_use]
    pub fn merge(config: &Config, cli: &Cli) -> Self {
        let io_threads = cli
            .io_threads
            .or(config.io_threads)
            .unwrap_or(DEFAULT_IO_THREADS)
            .max(1);
        let show_progress = !cli.no_progress && !cli.quiet && config.progress.unwrap_or(true);

        Self {
            io_threads,
            show_progress,
        }
    }
}
