//! Configuration loading and validation
//!
//! Settings are resolved in this priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Built-in defaults (fallback)
//!
//! The config file itself is located the same way: `--config` argument, then
//! `JC_CONFIG`, then the platform config directory.

use crate::period::MAX_WEEK;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "JC_CONFIG";
/// Environment variable overriding the roster path
pub const ROSTER_ENV_VAR: &str = "JC_ROSTER";
/// Environment variable overriding the maximum fuzzy-match distance
pub const MAX_DISTANCE_ENV_VAR: &str = "JC_MAX_DISTANCE";

/// Default first calendar week of the work year
pub const DEFAULT_FIRST_WEEK: u32 = 33;
/// Default maximum Levenshtein distance for typo-tolerant matching
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Configuration file contents
///
/// Every field is optional so that a partial file still loads.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Directories searched recursively for journals
    #[serde(default)]
    pub directories: Vec<PathBuf>,

    /// Roster file (`lastName;firstName` per line)
    #[serde(default)]
    pub roster: Option<PathBuf>,

    /// First calendar week of the work year (1-53)
    #[serde(default)]
    pub first_week_of_work_year: Option<u32>,

    /// Maximum Levenshtein distance for typo-tolerant matching
    #[serde(default)]
    pub max_distance: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub directories: Vec<PathBuf>,
    pub roster: Option<PathBuf>,
    pub first_week_of_work_year: Option<u32>,
    pub max_distance: Option<usize>,
}

/// Fully resolved audit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub directories: Vec<PathBuf>,
    pub roster: Option<PathBuf>,
    pub first_week_of_work_year: u32,
    pub max_distance: usize,
    pub log_level: String,
}

impl AuditConfig {
    /// Resolve configuration from overrides, environment, TOML file and defaults
    ///
    /// A config file that was named explicitly (argument or environment) must be
    /// readable; the platform default location is optional.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match resolve_config_path(overrides.config_path.as_deref()) {
            Some((path, explicit)) => match load_toml_config(&path) {
                Ok(config) => config,
                Err(e) if !explicit => {
                    warn!("Ignoring default config file {}: {}", path.display(), e);
                    TomlConfig::default()
                }
                Err(e) => return Err(e),
            },
            None => {
                info!("No config file found, using built-in defaults");
                TomlConfig::default()
            }
        };

        Ok(Self::merge(overrides, toml_config))
    }

    /// Merge already-loaded TOML values with overrides and environment
    pub fn merge(overrides: ConfigOverrides, toml_config: TomlConfig) -> Self {
        let directories = if overrides.directories.is_empty() {
            toml_config.directories
        } else {
            overrides.directories
        };

        let roster = overrides
            .roster
            .or_else(|| std::env::var(ROSTER_ENV_VAR).ok().map(PathBuf::from))
            .or(toml_config.roster);

        let first_week_of_work_year = overrides
            .first_week_of_work_year
            .or(toml_config.first_week_of_work_year)
            .unwrap_or(DEFAULT_FIRST_WEEK);

        let max_distance = overrides
            .max_distance
            .or_else(env_max_distance)
            .or(toml_config.max_distance)
            .unwrap_or(DEFAULT_MAX_DISTANCE);

        Self {
            directories,
            roster,
            first_week_of_work_year,
            max_distance,
            log_level: toml_config.logging.level,
        }
    }

    /// Check the configuration before an audit run
    ///
    /// Directories that do not exist are skipped with a warning; the run is
    /// rejected only if none remain.
    pub fn validate(mut self) -> Result<Self> {
        let (valid, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            self.directories.into_iter().partition(|d| d.is_dir());
        for dir in &missing {
            warn!("Directory not found, skipping: {}", dir.display());
        }
        if valid.is_empty() {
            return Err(Error::Config("No valid directory configured".to_string()));
        }
        self.directories = valid;

        match &self.roster {
            None => return Err(Error::Config("No roster file configured".to_string())),
            Some(path) if !path.is_file() => {
                return Err(Error::Config(format!(
                    "Roster file not found: {}",
                    path.display()
                )))
            }
            Some(_) => {}
        }

        if self.first_week_of_work_year == 0 || self.first_week_of_work_year > MAX_WEEK {
            return Err(Error::Config(format!(
                "First week of work year must be between 1 and {}: {}",
                MAX_WEEK, self.first_week_of_work_year
            )));
        }

        Ok(self)
    }
}

/// Locate the config file; the flag is `true` if it was named explicitly
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), true));
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some((PathBuf::from(path), true));
    }

    default_config_path()
        .filter(|p| p.exists())
        .map(|p| (p, false))
}

/// Platform config file location (`<config dir>/journal-checker/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("journal-checker").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
    info!("Loaded TOML configuration from {}", path.display());
    Ok(config)
}

fn env_max_distance() -> Option<usize> {
    let raw = std::env::var(MAX_DISTANCE_ENV_VAR).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(distance) => Some(distance),
        Err(_) => {
            warn!("Invalid {} value '{}', ignoring", MAX_DISTANCE_ENV_VAR, raw);
            None
        }
    }
}
