// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid configuration
//! and partial documents only override what they name:
//!
//! ```yaml
//! cache:
//!   capacity: 4096   # null for unbounded
//!   shards: 16
//! classifier:
//!   integer_limit: 1.0e15
//!   max_fraction_digits: 4
//! range:
//!   compact_limit: 20
//!   medium_limit: 100
//! batch:
//!   chunk_size: 320
//!   workers: 4
//!   parallel_threshold: 4096
//! ```

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest integer below which every integer is a binary64 value.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub classifier: ClassifierConfig,
    pub range: RangeConfig,
    pub batch: BatchConfig,
}

/// Conversion cache layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of stored entries; `None` stores every distinct input.
    pub capacity: Option<usize>,
    /// Number of independently locked shards. Must be a power of two.
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Some(4096),
            shards: 16,
        }
    }
}

/// Pattern classifier thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Integral values up to this magnitude are printed directly.
    pub integer_limit: f64,
    /// Smallest magnitude considered a simple decimal.
    pub min_simple: f64,
    /// Most fractional digits a simple decimal may have.
    pub max_fraction_digits: u32,
    pub scientific_low: f64,
    pub scientific_high: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            integer_limit: 1e15,
            min_simple: 1e-4,
            max_fraction_digits: 4,
            scientific_low: 1e-6,
            scientific_high: 1e15,
        }
    }
}

/// Decimal exponent limits for the Compact and Medium power tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    pub compact_limit: i32,
    pub medium_limit: i32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            compact_limit: 20,
            medium_limit: 100,
        }
    }
}

/// Parallel batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Inputs handed to a worker at a time.
    pub chunk_size: usize,
    /// Threads in the engine's own rayon pool; 0 shares rayon's global pool.
    pub workers: usize,
    /// Smaller batches are converted on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: 320,
            workers: 0,
            parallel_threshold: 4096,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let text = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text()?),
            Some("json") => Self::from_json_str(&text()?),
            _ => Err(ConfigError::UnknownExtension(path.to_path_buf())),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cache = &self.cache;
        if cache.shards == 0 || !cache.shards.is_power_of_two() {
            return Err(ConfigError::InvalidShardCount(cache.shards));
        }
        if cache.capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }

        let range = &self.range;
        if range.compact_limit < 0 || range.medium_limit < 0 {
            return Err(ConfigError::NegativeRangeLimit {
                compact: range.compact_limit,
                medium: range.medium_limit,
            });
        }
        if range.compact_limit > range.medium_limit {
            return Err(ConfigError::RangeLimitsInverted {
                compact: range.compact_limit,
                medium: range.medium_limit,
            });
        }

        let classifier = &self.classifier;
        let (low, high) = (classifier.scientific_low, classifier.scientific_high);
        if !(low > 0.0 && low < high && high.is_finite()) {
            return Err(ConfigError::ScientificThresholds { low, high });
        }
        let limit = classifier.integer_limit;
        if !(limit > 0.0 && limit <= MAX_EXACT_INTEGER) {
            return Err(ConfigError::IntegerLimit(limit));
        }
        if classifier.max_fraction_digits > 15 {
            return Err(ConfigError::FractionDigits(classifier.max_fraction_digits));
        }

        if self.batch.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }
}
