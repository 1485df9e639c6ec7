// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::presentation::DEFAULT_SUBJECT_MAX_LEN;
use crate::sensors::SensorCatalog;
use crate::status::{StalenessPolicy, DEFAULT_STALE_AFTER_SECS};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level
    pub log_level: String,

    /// Status derivation thresholds
    pub status: StatusConfig,

    /// Display settings
    pub presentation: PresentationConfig,

    /// Notification bus settings
    pub bus: BusConfig,

    /// Sensor name -> id table. Kept last so it serializes after the plain tables.
    pub catalog: SensorCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            status: StatusConfig::default(),
            presentation: PresentationConfig::default(),
            bus: BusConfig::default(),
            catalog: SensorCatalog::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load configuration, writing the defaults first if the file is missing
    pub fn open(path: &Path) -> Result<(Self, ConfigOrigin)> {
        if path.exists() {
            Ok((Self::load(path)?, ConfigOrigin::Loaded))
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok((config, ConfigOrigin::Created))
        }
    }

    /// Log filter from `log_level`; accepts `EnvFilter` directives such as
    /// `fleetwatch=debug`. Falls back to `info` when the value does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("fleetwatch"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Where [`Config::open`] got its configuration from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Loaded,
    Created,
}

/// Status derivation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Data or logs older than this many seconds are stale
    pub stale_after_secs: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }
}

impl StatusConfig {
    pub fn policy(&self) -> StalenessPolicy {
        StalenessPolicy::new(self.stale_after_secs)
    }
}

/// Presentation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Log subjects longer than this are truncated
    pub subject_max_len: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            subject_max_len: DEFAULT_SUBJECT_MAX_LEN,
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Buffered notifications per subscriber
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}
