// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Routing decisions made before digit generation.
//!
//! - [`pattern`]: which code path and statistics bucket an input belongs to
//! - [`range`]: which power-of-ten table the digit generator starts from

pub mod pattern;
pub mod range;

pub use pattern::{common_fraction, PatternCategory, PatternClassifier};
pub use range::{RangeClass, RangeSelector};
