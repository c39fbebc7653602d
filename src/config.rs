//! Verifier configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the bot pattern table inside the data directory.
pub const PATTERNS_FILE: &str = "user-agents.json";

/// Directory of per-bot range files inside the data directory.
pub const RANGES_DIR: &str = "bots";

/// Default maximum number of cached bot entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default entry time-to-live (1 hour).
pub const DEFAULT_TTL_SECS: u64 = 60 * 60;

/// Default background sweep interval (10 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10 * 60;

/// Range cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached bot entries
    pub max_entries: usize,
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
    /// Background sweep interval in seconds; `None` disables the sweep
    pub sweep_interval_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: Some(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Background sweep interval, if enabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs.map(Duration::from_secs)
    }
}

/// Configuration for a [`BotVerifier`](crate::BotVerifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Path of the bot pattern table
    pub patterns_path: PathBuf,
    /// Directory holding `<bot>.json` range files
    pub ranges_dir: PathBuf,
    /// Range cache settings
    pub cache: CacheConfig,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

impl VerifierConfig {
    /// Use the standard layout under `dir`:
    /// `dir/user-agents.json` and `dir/bots/<bot>.json`.
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            patterns_path: dir.join(PATTERNS_FILE),
            ranges_dir: dir.join(RANGES_DIR),
            cache: CacheConfig::default(),
        }
    }

    /// Set the cache settings.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Disable the background sweep.
    pub fn without_sweep(mut self) -> Self {
        self.cache.sweep_interval_secs = None;
        self
    }

    /// Load a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_entries == 0 {
            return Err(Error::Config("cache.max_entries must be at least 1".to_string()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache.ttl_secs must be at least 1".to_string()));
        }
        if self.cache.sweep_interval_secs == Some(0) {
            return Err(Error::Config(
                "cache.sweep_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
