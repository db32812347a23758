//! Configuration loading for the bridge.
//!
//! `input_files` is required. Everything else is optional.

use crate::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "LCBRIDGE_CONFIG";

/// Settings of the LCIO event algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LcioEventConfig {
    /// Input files, read in the given order.
    pub input_files: Vec<PathBuf>,
    /// Stop after this many events have been published.
    #[serde(default)]
    pub max_events: Option<u64>,
    /// Events to drop from the head of the stream before the first cycle.
    #[serde(default)]
    pub skip_events: u64,
}

impl LcioEventConfig {
    pub fn new(input_files: Vec<PathBuf>) -> Self {
        Self {
            input_files,
            max_events: None,
            skip_events: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_files.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "input_files",
                reason: "must not be empty".to_string(),
            });
        }
        if self
            .input_files
            .iter()
            .any(|p| p.as_os_str().is_empty() || p.to_string_lossy().trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "input_files",
                reason: "entries must not be blank".to_string(),
            });
        }
        if self.max_events == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_events",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level configuration file of the `lcbridge` binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Optional hard limit on host loop cycles.
    #[serde(default)]
    pub max_cycles: Option<u64>,
    pub lcio_event: LcioEventConfig,
}

impl BridgeConfig {
    /// Load from `--config <path>` or [`CONFIG_ENV_VAR`], then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cycles == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_cycles",
                reason: "must be > 0".to_string(),
            });
        }
        self.lcio_event.validate()
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
