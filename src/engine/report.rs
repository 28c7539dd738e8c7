// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Human-readable and JSON renderings of engine statistics.

use crate::classify::{PatternCategory, RangeClass};
use crate::state::{Counters, StatsSnapshot};
use serde::Serialize;
use std::fmt;
use strum::IntoEnumIterator;

/// One row of a distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub name: &'static str,
    pub count: u64,
    pub percent: f64,
}

/// Snapshot of an engine's counters. Building one does not reset anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub total_conversions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_ratio_percent: f64,
    pub cache_entries: usize,
    pub cache_capacity: Option<usize>,
    pub fast_path: u64,
    pub exact_fallbacks: u64,
    pub average_exponent: f64,
    pub patterns: Vec<BucketCount>,
    pub ranges: Vec<BucketCount>,
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

impl PerformanceReport {
    pub fn new(stats: &StatsSnapshot, cache_entries: usize, cache_capacity: Option<usize>) -> Self {
        let total = stats.get(Counters::Conversions);
        let hits = stats.get(Counters::CacheHits);
        let misses = stats.get(Counters::CacheMisses);
        let range_total = stats.range_total();

        let patterns = PatternCategory::iter()
            .map(|p| {
                let count = stats.pattern_count(p);
                BucketCount {
                    name: p.name(),
                    count,
                    percent: percent(count, total),
                }
            })
            .collect();
        let ranges = RangeClass::iter()
            .map(|r| {
                let count = stats.range_count(r);
                BucketCount {
                    name: r.name(),
                    count,
                    percent: percent(count, range_total),
                }
            })
            .collect();

        Self {
            total_conversions: total,
            cache_hits: hits,
            cache_misses: misses,
            hit_ratio_percent: percent(hits, hits + misses),
            cache_entries,
            cache_capacity,
            fast_path: stats.get(Counters::FastPath),
            exact_fallbacks: stats.get(Counters::ExactFallbacks),
            average_exponent: stats.average_exponent,
            patterns,
            ranges,
        }
    }

    pub fn pattern(&self, pattern: PatternCategory) -> u64 {
        self.patterns[pattern as usize].count
    }

    pub fn range(&self, range: RangeClass) -> u64 {
        self.ranges[range as usize].count
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ADAPTIVE CONVERTER PERFORMANCE REPORT")?;
        writeln!(f, "Total Conversions: {}", self.total_conversions)?;
        writeln!(
            f,
            "Cache Hit Rate: {:.1}% ({} hits, {} misses)",
            self.hit_ratio_percent, self.cache_hits, self.cache_misses
        )?;
        match self.cache_capacity {
            Some(capacity) => writeln!(f, "Cache Entries: {} / {}", self.cache_entries, capacity)?,
            None => writeln!(f, "Cache Entries: {}", self.cache_entries)?,
        }
        writeln!(f, "Fast Path: {}", self.fast_path)?;
        writeln!(f, "Exact Fallbacks: {}", self.exact_fallbacks)?;

        writeln!(f, "\nPattern Distribution:")?;
        for bucket in &self.patterns {
            writeln!(f, "  {}: {} ({:.1}%)", bucket.name, bucket.count, bucket.percent)?;
        }
        writeln!(f, "\nRange Usage:")?;
        for bucket in &self.ranges {
            writeln!(f, "  {}: {} ({:.1}%)", bucket.name, bucket.count, bucket.percent)?;
        }
        writeln!(f, "\nAverage Exponent: {:.2}", self.average_exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EngineStats;

    fn sample() -> PerformanceReport {
        let stats = EngineStats::new();
        for _ in 0..3 {
            stats.increment(Counters::Conversions);
        }
        stats.increment(Counters::CacheHits);
        stats.increment(Counters::CacheMisses);
        stats.increment(Counters::CacheMisses);
        stats.record_pattern(PatternCategory::Integer);
        stats.record_pattern(PatternCategory::Integer);
        stats.record_pattern(PatternCategory::Complex);
        stats.record_range(RangeClass::Compact);
        PerformanceReport::new(&stats.snapshot(), 2, Some(4096))
    }

    #[test]
    fn test_percentages() {
        let report = sample();
        assert!((report.hit_ratio_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.pattern(PatternCategory::Integer), 2);
        assert_eq!(report.range(RangeClass::Compact), 1);
        assert_eq!(report.ranges[RangeClass::Compact as usize].percent, 100.0);
    }

    #[test]
    fn test_empty_report_has_no_nan() {
        let report = PerformanceReport::new(&EngineStats::new().snapshot(), 0, None);
        assert_eq!(report.hit_ratio_percent, 0.0);
        assert!(report.patterns.iter().all(|b| b.percent == 0.0));
    }

    #[test]
    fn test_text_rendering() {
        let text = sample().to_string();
        assert!(text.contains("Total Conversions: 3"));
        assert!(text.contains("Cache Hit Rate: 33.3%"));
        assert!(text.contains("Cache Entries: 2 / 4096"));
        assert!(text.contains("  Integer: 2 (66.7%)"));
        assert!(text.contains("  Compact: 1 (100.0%)"));
    }

    #[test]
    fn test_json_rendering() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_conversions"], 3);
        assert_eq!(value["patterns"][1]["name"], "Integer");
        assert_eq!(value["cache_capacity"], 4096);
    }
}
