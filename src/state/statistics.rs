// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are zero at engine construction, incremented by every conversion
//! and only ever read by reporting. All updates are relaxed atomics, so a
//! snapshot taken while other threads convert is approximate but never torn
//! per counter.

use crate::classify::{PatternCategory, RangeClass};
use std::sync::atomic::{AtomicU64, Ordering};
use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

/// Weight of the newest sample in the running exponent average.
const EXPONENT_SMOOTHING: f64 = 0.01;

#[derive(Debug, EnumCountMacro, EnumIter, IntoStaticStr, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    Conversions,
    CacheHits,
    CacheMisses,
    /// Answered without digit generation (integers, common fractions).
    FastPath,
    /// Digit generation that needed the exact big-integer generator.
    ExactFallbacks,
}

#[derive(Debug)]
pub struct EngineStats {
    counters: [AtomicU64; Counters::COUNT],
    patterns: [AtomicU64; PatternCategory::COUNT],
    ranges: [AtomicU64; RangeClass::COUNT],
    /// `f64` bits of the running average of input decimal exponents.
    average_exponent: AtomicU64,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self {
            counters: std::array::from_fn(|_| AtomicU64::new(0)),
            patterns: std::array::from_fn(|_| AtomicU64::new(0)),
            ranges: std::array::from_fn(|_| AtomicU64::new(0)),
            average_exponent: AtomicU64::new(0f64.to_bits()),
        }
    }
}

impl EngineStats {
    pub fn new() -> Self {
        EngineStats::default()
    }

    /// Increment the specified counter by 1.
    pub fn increment(&self, counter: Counters) {
        self.counters[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.counters[counter as usize].load(Ordering::Relaxed)
    }

    pub fn record_pattern(&self, pattern: PatternCategory) {
        self.patterns[pattern as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn pattern_count(&self, pattern: PatternCategory) -> u64 {
        self.patterns[pattern as usize].load(Ordering::Relaxed)
    }

    pub fn record_range(&self, range: RangeClass) {
        self.ranges[range as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn range_count(&self, range: RangeClass) -> u64 {
        self.ranges[range as usize].load(Ordering::Relaxed)
    }

    /// Fold a decimal exponent into the exponential running average.
    pub fn record_exponent(&self, decimal_exponent: f64) {
        // the closure always returns Some, so this cannot fail
        let _ = self
            .average_exponent
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                let average = f64::from_bits(bits);
                let next = average * (1.0 - EXPONENT_SMOOTHING)
                    + decimal_exponent * EXPONENT_SMOOTHING;
                Some(next.to_bits())
            });
    }

    pub fn average_exponent(&self) -> f64 {
        f64::from_bits(self.average_exponent.load(Ordering::Relaxed))
    }

    /// Copy every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            counters: std::array::from_fn(|i| self.counters[i].load(Ordering::Relaxed)),
            patterns: std::array::from_fn(|i| self.patterns[i].load(Ordering::Relaxed)),
            ranges: std::array::from_fn(|i| self.ranges[i].load(Ordering::Relaxed)),
            average_exponent: self.average_exponent(),
        }
    }
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    counters: [u64; Counters::COUNT],
    patterns: [u64; PatternCategory::COUNT],
    ranges: [u64; RangeClass::COUNT],
    pub average_exponent: f64,
}

impl StatsSnapshot {
    pub fn get(&self, counter: Counters) -> u64 {
        self.counters[counter as usize]
    }

    pub fn pattern_count(&self, pattern: PatternCategory) -> u64 {
        self.patterns[pattern as usize]
    }

    pub fn range_count(&self, range: RangeClass) -> u64 {
        self.ranges[range as usize]
    }

    /// Total over all range classes.
    pub fn range_total(&self) -> u64 {
        self.ranges.iter().sum()
    }
}
