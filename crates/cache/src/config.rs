//! Cache configuration: capacity, memory share and cost model.
//!
//! Configuration can be loaded from a TOML file, environment variables,
//! or created programmatically.

use std::fs;
use std::hash::Hash;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cost::CostModel;
use crate::memory_budget::{MemoryBudget, DEFAULT_MEMORY_DIVISOR};
use crate::resource::ResourceCache;

/// Explicit cache capacity in kilobytes (or entries with the `unit` model)
pub const ENV_CAPACITY_KB: &str = "SVG_VIEW_CACHE_KB";
/// Divisor applied to the max memory when no explicit capacity is set
pub const ENV_DIVISOR: &str = "SVG_VIEW_CACHE_DIVISOR";
/// Cost model name, `unit` or `kilobytes`
pub const ENV_COST_MODEL: &str = "SVG_VIEW_CACHE_COST";

/// Configuration for the resource cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Fixed capacity; when absent the capacity comes from the memory budget
    pub capacity_kb: Option<usize>,
    /// The cache gets `1 / memory_divisor` of the max memory
    pub memory_divisor: usize,
    /// How entries are charged against the capacity
    pub cost_model: CostModel,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity_kb: None,
            memory_divisor: DEFAULT_MEMORY_DIVISOR,
            cost_model: CostModel::default(),
        }
    }
}

impl CacheConfig {
    /// Sets a fixed capacity, bypassing the memory budget.
    pub fn with_capacity_kb(mut self, kb: usize) -> Self {
        self.capacity_kb = Some(kb);
        self
    }

    /// Sets the share of max memory given to the cache.
    pub fn with_memory_divisor(mut self, divisor: usize) -> Self {
        self.memory_divisor = divisor;
        self
    }

    /// Sets the cost model.
    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Returns the default configuration file path for the current platform.
    ///
    /// - macOS: ~/Library/Application Support/svg-view/cache.toml
    /// - Linux: ~/.config/svg-view/cache.toml
    /// - Windows: %APPDATA%\svg-view\cache.toml
    pub fn default_config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("svg-view").join("cache.toml"),
            None => PathBuf::from("svg-view-cache.toml"),
        }
    }

    /// Loads the default configuration file if present, then applies
    /// environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file exists but is invalid, or if an
    /// environment variable holds an invalid value.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Same as [`load_or_default`](Self::load_or_default) with an explicit
    /// file path.
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env()
    }

    /// Loads configuration from environment variables over the defaults.
    ///
    /// Environment variables:
    /// - `SVG_VIEW_CACHE_KB`: fixed capacity
    /// - `SVG_VIEW_CACHE_DIVISOR`: memory divisor (default: 8)
    /// - `SVG_VIEW_CACHE_COST`: `unit` or `kilobytes` (default: kilobytes)
    ///
    /// # Errors
    /// Returns an error if any environment variable contains an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Applies environment overrides to this configuration.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var(ENV_CAPACITY_KB) {
            self.capacity_kb = Some(parse_env(ENV_CAPACITY_KB, &val)?);
        }

        if let Ok(val) = std::env::var(ENV_DIVISOR) {
            self.memory_divisor = parse_env(ENV_DIVISOR, &val)?;
        }

        if let Ok(val) = std::env::var(ENV_COST_MODEL) {
            self.cost_model = CostModel::parse(&val)
                .ok_or_else(|| ConfigError::InvalidValue(ENV_COST_MODEL.to_string()))?;
        }

        Ok(self)
    }

    /// Loads configuration from a TOML file.
    ///
    /// Expected file format:
    /// ```toml
    /// capacity-kb = 16384
    /// memory-divisor = 8
    /// cost-model = "kilobytes"
    /// ```
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Saves configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Converts configuration to TOML format.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Capacity the cache should be built with.
    ///
    /// An explicit capacity wins; otherwise the budget's share of max memory.
    pub fn resolve_capacity(&self, budget: &MemoryBudget) -> usize {
        match self.capacity_kb {
            Some(kb) => kb,
            None => budget.with_divisor(self.memory_divisor).cache_capacity_kb(),
        }
    }

    /// Builds a resource cache sized against `budget`.
    pub fn build_cache<K, V>(&self, budget: &MemoryBudget) -> ResourceCache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let capacity = self.resolve_capacity(budget);
        info!(
            capacity,
            cost_model = ?self.cost_model,
            explicit = self.capacity_kb.is_some(),
            "creating resource cache"
        );
        ResourceCache::with_cost_model(capacity, self.cost_model)
    }

    /// Builds a resource cache sized against the host's memory.
    pub fn build_cache_for_system<K, V>(&self) -> ResourceCache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        self.build_cache(&MemoryBudget::from_system())
    }
}

fn parse_env(name: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid value for a configuration parameter
    #[error("invalid value for configuration key: {0}")]
    InvalidValue(String),
    /// I/O error reading or writing configuration file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
