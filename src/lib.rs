// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Adaptive shortest round-trip conversion of `f64` to decimal strings.
//!
//! For every finite input the converter produces the decimal with the fewest
//! significant digits that parses back to exactly the same bits, choosing the
//! one closest to the exact binary value and breaking ties to an even last
//! digit.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Precomputed once per process and shared by every engine:
//! - Compact, Medium and Full power-of-ten tables (see [`memo::powers`])
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Owned by one [`AdaptiveEngine`], updated through `&self` from any thread:
//! - Conversion cache keyed by input bit pattern (see [`state::cache`])
//! - Pattern, range and cache statistics (see [`state::statistics`])
//!
//! # Conversion Pipeline
//!
//! 1. **Classify**: special value, integer, simple decimal, scientific or complex
//! 2. **Cache**: return a previously rendered string for the same bits
//! 3. **Fast path**: integers and common fractions skip digit generation
//! 4. **Digit generation**: a fast 64-bit generator using the power table chosen
//!    by the input's magnitude, with an exact big-integer fallback whenever
//!    the fast generator cannot prove its answer
//!
//! Only steps 3 and 4 produce digits, and both produce identical output, so the
//! routing decisions are never visible in results.
//!
//! # Output Format
//!
//! Special values render as `NaN`, `+Inf`, `-Inf`, `0` and `-0`. Finite values
//! use plain notation: `0.1`, `123.456`, `1e21` becomes
//! `1000000000000000000000` and `5e-324` becomes `0.` followed by 323 zeros and
//! a `5`.

pub mod classify;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod float;
pub mod memo;
pub mod state;
pub mod strategy;

// Re-export commonly used types
pub use classify::{PatternCategory, RangeClass};
pub use config::{ConfigError, EngineConfig};
pub use decimal::{Decimal, DecimalResult, SpecialValue};
pub use engine::{AdaptiveEngine, EngineBuilder, PerformanceReport};
