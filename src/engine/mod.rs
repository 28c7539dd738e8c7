// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Adaptive conversion engine.
//!
//! The engine composes the pipeline:
//!
//! 1. classify the input into a [`PatternCategory`]
//! 2. look the bit pattern up in the [`ConversionCache`]
//! 3. on a miss, take a fast path (special values, integers, common fractions)
//!    or select a power table with the [`RangeSelector`] and run the digit
//!    generator on the input's rounding interval
//! 4. render, store in the cache and update [`EngineStats`]
//!
//! The classification and table choice only affect speed and statistics, never
//! the output.
//!
//! # Example
//!
//! ```
//! use adaptive_dragonbox::engine::AdaptiveEngine;
//!
//! let engine = AdaptiveEngine::new();
//! assert_eq!(engine.convert(0.1), "0.1");
//! assert_eq!(engine.convert(1e21), "1000000000000000000000");
//! assert_eq!(engine.convert(-0.0), "-0");
//!
//! let out = engine.batch_convert(&[1.5, f64::NAN, 2.0]);
//! assert_eq!(out, ["1.5", "NaN", "2"]);
//! ```

pub mod fast_path;
pub mod report;

pub use report::{BucketCount, PerformanceReport};

use crate::classify::{PatternCategory, PatternClassifier, RangeSelector};
use crate::config::{ConfigError, EngineConfig};
use crate::decimal::{Decimal, DecimalResult, SpecialValue};
use crate::float::constants::floor_log10_pow2;
use crate::float::{Boundaries, FloatBits};
use crate::state::{ConversionCache, Counters, EngineStats};
use crate::strategy::{format_shortest, DigitGenerator};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use strum::EnumCount;
use tracing::{debug, trace};

/// Shortest round-trip converter with its own cache and statistics.
///
/// `Send + Sync`: share it by reference or through an `Arc`.
#[derive(Debug)]
pub struct AdaptiveEngine {
    config: EngineConfig,
    classifier: PatternClassifier,
    selector: RangeSelector,
    cache: ConversionCache,
    stats: EngineStats,
    /// Dedicated pool for [`par_batch_convert`](Self::par_batch_convert) when
    /// a worker count is configured; `None` uses rayon's global pool.
    workers: Option<ThreadPool>,
}

impl AdaptiveEngine {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), None)
    }

    /// Engine with a validated configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = match config.batch.workers {
            0 => None,
            n => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("dragonbox-worker-{}", i))
                    .build()?,
            ),
        };
        Ok(Self::build(config, workers))
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    fn build(config: EngineConfig, workers: Option<ThreadPool>) -> Self {
        debug!(
            cache_capacity = ?config.cache.capacity,
            cache_shards = config.cache.shards,
            workers = workers.as_ref().map_or(0, ThreadPool::current_num_threads),
            compact_limit = config.range.compact_limit,
            medium_limit = config.range.medium_limit,
            "creating adaptive engine"
        );
        Self {
            classifier: PatternClassifier::new(&config.classifier),
            selector: RangeSelector::new(&config.range),
            cache: ConversionCache::new(&config.cache),
            stats: EngineStats::new(),
            workers,
            config,
        }
    }

    /// Shortest round-trip decimal string for `value`.
    pub fn convert(&self, value: f64) -> String {
        self.convert_shared(value).to_string()
    }

    /// Like [`convert`](Self::convert), returning the cached allocation.
    pub fn convert_shared(&self, value: f64) -> Arc<str> {
        let bits = value.to_bits();
        let pattern = self.classifier.classify(value);
        self.stats.increment(Counters::Conversions);
        self.stats.record_pattern(pattern);
        self.record_exponent(value);

        if let Some(hit) = self.cache.lookup(bits) {
            self.stats.increment(Counters::CacheHits);
            return hit;
        }
        self.stats.increment(Counters::CacheMisses);

        let rendered: Arc<str> = Arc::from(self.compute(value, pattern, true).to_string());
        self.cache.store(bits, Arc::clone(&rendered));
        rendered
    }

    /// Digits and exponent for `value`, bypassing the cache and statistics.
    pub fn decimal(&self, value: f64) -> DecimalResult {
        self.compute(value, self.classifier.classify(value), false)
    }

    /// Convert every input, preserving order.
    ///
    /// Inputs are processed grouped by pattern category so that similar values
    /// run back to back.
    pub fn batch_convert(&self, values: &[f64]) -> Vec<String> {
        let mut groups: [Vec<usize>; PatternCategory::COUNT] = Default::default();
        for (i, &v) in values.iter().enumerate() {
            groups[self.classifier.classify(v) as usize].push(i);
        }

        let mut results = vec![String::new(); values.len()];
        for index in groups.iter().flatten() {
            results[*index] = self.convert(values[*index]);
        }
        results
    }

    /// [`batch_convert`](Self::batch_convert) spread over a rayon thread pool,
    /// one chunk of `chunk_size` inputs per task.
    ///
    /// Inputs shorter than the configured parallel threshold are converted on
    /// the calling thread. A panic in any task propagates to the caller.
    pub fn par_batch_convert(&self, values: &[f64]) -> Vec<String> {
        let batch = &self.config.batch;
        if values.len() < batch.parallel_threshold {
            return self.batch_convert(values);
        }

        let chunk_size = batch.chunk_size;
        trace!(chunk_size, inputs = values.len(), "parallel batch");
        let convert = || {
            values
                .par_chunks(chunk_size)
                .flat_map_iter(|chunk| self.batch_convert(chunk))
                .collect::<Vec<String>>()
        };
        match &self.workers {
            Some(pool) => pool.install(convert),
            None => convert(),
        }
    }

    pub fn performance_report(&self) -> PerformanceReport {
        PerformanceReport::new(
            &self.stats.snapshot(),
            self.cache.len(),
            self.cache.capacity(),
        )
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ConversionCache {
        &self.cache
    }

    fn record_exponent(&self, value: f64) {
        let bits = FloatBits::from_f64(value);
        if bits.is_finite_nonzero() {
            self.stats
                .record_exponent(bits.unbiased_exponent() as f64 * std::f64::consts::LOG10_2);
        }
    }

    fn compute(&self, value: f64, pattern: PatternCategory, record: bool) -> DecimalResult {
        let bits = FloatBits::from_f64(value);
        if let Some(special) = SpecialValue::detect(bits) {
            return DecimalResult::Special(special);
        }

        if let Some(decimal) =
            fast_path::try_fast_path(value, pattern, self.classifier.integer_limit())
        {
            if record {
                self.stats.increment(Counters::FastPath);
            }
            trace!(value, pattern = pattern.name(), "fast path");
            return DecimalResult::Finite(decimal);
        }

        let range = self.selector.select(bits.unbiased_exponent());
        let shortest = format_shortest(&Boundaries::new(bits), range);
        let exact = shortest.generator == DigitGenerator::Exact;
        if record {
            self.stats.record_range(shortest.table);
            if exact {
                self.stats.increment(Counters::ExactFallbacks);
            }
        }
        trace!(
            value,
            pattern = pattern.name(),
            selected = range.name(),
            table = shortest.table.name(),
            exact,
            decimal_estimate = floor_log10_pow2(bits.unbiased_exponent()),
            "digit generation"
        );
        DecimalResult::Finite(Decimal::new(bits.sign, shortest.digits))
    }
}

impl Default for AdaptiveEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental construction of an [`AdaptiveEngine`].
///
/// ```
/// use adaptive_dragonbox::engine::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .cache_capacity(Some(128))
///     .cache_shards(4)
///     .workers(2)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(engine.cache().capacity(), Some(128));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a complete configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.config.cache.capacity = capacity;
        self
    }

    pub fn cache_shards(mut self, shards: usize) -> Self {
        self.config.cache.shards = shards;
        self
    }

    pub fn range_limits(mut self, compact: i32, medium: i32) -> Self {
        self.config.range.compact_limit = compact;
        self.config.range.medium_limit = medium;
        self
    }

    pub fn integer_limit(mut self, limit: f64) -> Self {
        self.config.classifier.integer_limit = limit;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.batch.workers = workers;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.batch.chunk_size = chunk_size;
        self
    }

    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.batch.parallel_threshold = threshold;
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<AdaptiveEngine, ConfigError> {
        AdaptiveEngine::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RangeClass;

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdaptiveEngine>();
    }

    #[test]
    fn test_special_values() {
        let engine = AdaptiveEngine::new();
        assert_eq!(engine.convert(f64::NAN), "NaN");
        assert_eq!(engine.convert(f64::INFINITY), "+Inf");
        assert_eq!(engine.convert(f64::NEG_INFINITY), "-Inf");
        assert_eq!(engine.convert(0.0), "0");
        assert_eq!(engine.convert(-0.0), "-0");
    }

    #[test]
    fn test_routes_are_counted() {
        let engine = AdaptiveEngine::new();
        engine.convert(42.0);
        engine.convert(0.25);
        engine.convert(1.0 / 3.0);
        engine.convert(1e200);
        let stats = engine.stats();
        assert_eq!(stats.get(Counters::Conversions), 4);
        assert_eq!(stats.get(Counters::FastPath), 2);
        assert_eq!(stats.pattern_count(PatternCategory::Integer), 1);
        assert_eq!(stats.pattern_count(PatternCategory::Complex), 1);
        assert_eq!(stats.range_count(RangeClass::Compact), 1);
        assert_eq!(stats.range_count(RangeClass::Full), 1);
    }

    #[test]
    fn test_second_call_hits_cache() {
        let engine = AdaptiveEngine::new();
        let first = engine.convert_shared(2.5);
        let second = engine.convert_shared(2.5);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.stats().get(Counters::CacheHits), 1);
        assert_eq!(engine.stats().get(Counters::CacheMisses), 1);
    }

    #[test]
    fn test_decimal_bypasses_state() {
        let engine = AdaptiveEngine::new();
        let DecimalResult::Finite(d) = engine.decimal(-123.456) else {
            panic!("finite input");
        };
        assert!(d.is_negative());
        assert_eq!(d.digits(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(d.exponent(), 3);
        assert_eq!(engine.stats().get(Counters::Conversions), 0);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(matches!(
            EngineBuilder::new().cache_shards(3).build(),
            Err(ConfigError::InvalidShardCount(3))
        ));
        assert!(EngineBuilder::new().range_limits(10, 5).build().is_err());
    }

    #[test]
    fn test_small_parallel_batch_matches_sequential() {
        let engine = EngineBuilder::new()
            .workers(3)
            .chunk_size(7)
            .parallel_threshold(10)
            .build()
            .unwrap();
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.37 - 5.0).collect();
        assert_eq!(engine.par_batch_convert(&values), engine.batch_convert(&values));
        assert_eq!(engine.workers.as_ref().map(ThreadPool::current_num_threads), Some(3));
    }

    #[test]
    fn test_global_pool_batch_matches_sequential() {
        let engine = EngineBuilder::new()
            .chunk_size(5)
            .parallel_threshold(1)
            .build()
            .unwrap();
        assert!(engine.workers.is_none());
        let values: Vec<f64> = (0..64).map(|i| 1.0 / (i as f64 + 1.0)).collect();
        assert_eq!(engine.par_batch_convert(&values), engine.batch_convert(&values));
        assert!(engine.par_batch_convert(&[]).is_empty());
    }

    #[test]
    fn test_range_counts_follow_serving_table() {
        // Compact is selected for everything, but it cannot serve 1e-250
        let engine = EngineBuilder::new().range_limits(400, 400).build().unwrap();
        engine.convert(1e-250 / 3.0);
        engine.convert(1.0 / 3.0);
        assert_eq!(engine.stats().range_count(RangeClass::Full), 1);
        assert_eq!(engine.stats().range_count(RangeClass::Compact), 1);
    }
}
