// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 2: DYNAMIC state (mutable, owned by one engine).
//!
//! - [`cache`]: memoized results keyed by input bit pattern
//! - [`statistics`]: pattern, range and cache counters
//!
//! Both are safe to update from many threads through a shared reference.

pub mod cache;
pub mod statistics;

pub use cache::ConversionCache;
pub use statistics::{Counters, EngineStats, StatsSnapshot};
