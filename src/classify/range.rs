// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Range selection: which power-of-ten table the digit generator consults.
//!
//! Everyday magnitudes (decimal exponent within ±20) use the dense Compact
//! table, moderate magnitudes the Medium table, and everything else the Full
//! table that spans the whole binary64 exponent range. All three tables produce
//! identical digits wherever they overlap; the choice is purely about locality.

use crate::config::RangeConfig;
use crate::float::constants::floor_log10_pow2;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

/// Granularity of the power-of-ten table used for one conversion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCountMacro, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
pub enum RangeClass {
    Compact,
    Medium,
    Full,
}

impl RangeClass {
    /// The next larger table, if any.
    pub fn wider(self) -> Option<RangeClass> {
        match self {
            RangeClass::Compact => Some(RangeClass::Medium),
            RangeClass::Medium => Some(RangeClass::Full),
            RangeClass::Full => None,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Maps binary exponents to a [`RangeClass`] using fixed decimal thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelector {
    compact_limit: i32,
    medium_limit: i32,
}

impl RangeSelector {
    pub fn new(config: &RangeConfig) -> Self {
        Self {
            compact_limit: config.compact_limit,
            medium_limit: config.medium_limit,
        }
    }

    /// Select the table for a value whose leading binary digit has weight
    /// `2^unbiased_exponent`.
    pub fn select(&self, unbiased_exponent: i32) -> RangeClass {
        let decimal = floor_log10_pow2(unbiased_exponent).abs();
        if decimal <= self.compact_limit {
            RangeClass::Compact
        } else if decimal <= self.medium_limit {
            RangeClass::Medium
        } else {
            RangeClass::Full
        }
    }
}

impl Default for RangeSelector {
    fn default() -> Self {
        Self::new(&RangeConfig::default())
    }
}
