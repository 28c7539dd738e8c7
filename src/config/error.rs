// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for loading and validating engine configuration.

use std::path::PathBuf;

/// Errors raised while building an [`EngineConfig`](super::EngineConfig).
///
/// Conversion itself never fails; these only surface at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config file extension for {} (expected .yaml, .yml or .json)", .0.display())]
    UnknownExtension(PathBuf),

    #[error("cache shard count must be a nonzero power of two, got {0}")]
    InvalidShardCount(usize),

    #[error("cache capacity must be nonzero when set")]
    ZeroCapacity,

    #[error("compact range limit {compact} exceeds medium range limit {medium}")]
    RangeLimitsInverted { compact: i32, medium: i32 },

    #[error("range limits must be non-negative, got compact {compact}, medium {medium}")]
    NegativeRangeLimit { compact: i32, medium: i32 },

    #[error("batch chunk size must be nonzero")]
    ZeroChunkSize,

    #[error("scientific thresholds must satisfy 0 < low < high, got low {low}, high {high}")]
    ScientificThresholds { low: f64, high: f64 },

    #[error("integer limit {0} must be positive and at most 2^53")]
    IntegerLimit(f64),

    #[error("max fraction digits {0} out of range 0..=15")]
    FractionDigits(u32),

    #[error("cannot start batch worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
