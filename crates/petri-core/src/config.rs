//! Configuration loading and typed config structures for the Petri Life engine.
//!
//! The configuration lives in `petri-config.yaml` at the project root, or
//! wherever the `PETRI_CONFIG` environment variable points. Every field has
//! a default, so a partial file (or none at all) is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "petri-config.yaml";

/// Environment variable that overrides the configuration path.
pub const CONFIG_PATH_ENV: &str = "PETRI_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `petri-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PetriConfig {
    /// Grid size, seeding and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Run bounds and stop conditions.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Pattern library settings.
    #[serde(default)]
    pub library: LibraryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PetriConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::from_file(path)?;
            info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        } else {
            info!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// The configuration path: `PETRI_CONFIG` if set, else [`DEFAULT_CONFIG_PATH`].
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }
}

/// World configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Grid side length.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Random seed for the initial fill.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between generations.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Probability that a cell starts alive (0.0 = no random fill).
    #[serde(default)]
    pub random_density: f64,

    /// Seed-shelf pattern to place centred at startup.
    #[serde(default)]
    pub seed_pattern: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            random_density: 0.0,
            seed_pattern: None,
        }
    }
}

/// Simulation bounds and stop conditions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Maximum generations per run (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Maximum wall-clock seconds per run (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// End the run once every cell is dead.
    #[serde(default)]
    pub stop_on_extinction: bool,

    /// End the run once the grid repeats a recent state.
    #[serde(default)]
    pub detect_cycles: bool,

    /// How many recent grids cycle detection remembers.
    #[serde(default = "default_cycle_history")]
    pub cycle_history: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            max_real_time_seconds: 0,
            stop_on_extinction: false,
            detect_cycles: false,
            cycle_history: default_cycle_history(),
        }
    }
}

/// Pattern library configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryConfig {
    /// Patterns per library page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Save the built-in seed shelf into the library at startup.
    #[serde(default = "default_true")]
    pub load_seed_patterns: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            load_seed_patterns: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Generations between info-level progress summaries.
    #[serde(default = "default_summary_interval")]
    pub summary_interval: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            summary_interval: default_summary_interval(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_size() -> usize {
    10
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_cycle_history() -> usize {
    10
}

const fn default_page_size() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_interval() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}
