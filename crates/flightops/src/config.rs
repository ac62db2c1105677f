//! Configuration management for flightops.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightops";

/// Default maintenance database file name.
const MAINTENANCE_DB_NAME: &str = "maintenance.db";

/// Default weather database file name.
const WEATHER_DB_NAME: &str = "weather.db";

/// Default fuel database file name.
const FUEL_DB_NAME: &str = "fuel.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTOPS_`)
/// 2. TOML config file at `~/.config/flightops/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage-related configuration.
///
/// Each module keeps its records in its own database file. The paths default
/// to well-known names under the data directory but can be set individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the database files.
    /// Defaults to `~/.local/share/flightops`.
    pub data_dir: Option<PathBuf>,
    /// Path to the maintenance database file.
    pub maintenance_db: Option<PathBuf>,
    /// Path to the weather database file.
    pub weather_db: Option<PathBuf>,
    /// Path to the fuel database file.
    pub fuel_db: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FLIGHTOPS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("FLIGHTOPS_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// Each module owns its database file, so two modules pointed at the same
    /// file are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("maintenance", self.maintenance_db_path()),
            ("weather", self.weather_db_path()),
            ("fuel", self.fuel_db_path()),
        ];

        for (i, (name_a, path_a)) in paths.iter().enumerate() {
            for (name_b, path_b) in paths.iter().skip(i + 1) {
                if path_a == path_b {
                    return Err(Error::ConfigValidation {
                        message: format!(
                            "{name_a} and {name_b} modules must use distinct database files (both: {})",
                            path_a.display()
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the maintenance database path, resolving defaults if not set.
    #[must_use]
    pub fn maintenance_db_path(&self) -> PathBuf {
        self.storage
            .maintenance_db
            .clone()
            .unwrap_or_else(|| self.data_dir().join(MAINTENANCE_DB_NAME))
    }

    /// Get the weather database path, resolving defaults if not set.
    #[must_use]
    pub fn weather_db_path(&self) -> PathBuf {
        self.storage
            .weather_db
            .clone()
            .unwrap_or_else(|| self.data_dir().join(WEATHER_DB_NAME))
    }

    /// Get the fuel database path, resolving defaults if not set.
    #[must_use]
    pub fn fuel_db_path(&self) -> PathBuf {
        self.storage
            .fuel_db
            .clone()
            .unwrap_or_else(|| self.data_dir().join(FUEL_DB_NAME))
    }
}
