// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Shortcuts that skip digit generation.
//!
//! Each one produces exactly the digits the general generator would: an
//! integer below 2^53 is its own shortest representation, and the common
//! fractions are stored with their shortest digits.

use crate::classify::{common_fraction, PatternCategory};
use crate::decimal::Decimal;
use crate::float::FloatBits;

/// Largest magnitude whose integral values print exactly from `u64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Exact digits of an integral value no larger than `limit`.
pub fn integer(value: f64, limit: f64) -> Option<Decimal> {
    let magnitude = value.abs();
    if value != value.trunc() || magnitude > limit.min(MAX_EXACT_INTEGER) || magnitude == 0.0 {
        return None;
    }
    Some(Decimal::from_integer(value.is_sign_negative(), magnitude as u64))
}

/// Digits of `±f` for a common fraction `f`.
pub fn fraction(bits: FloatBits) -> Option<Decimal> {
    common_fraction(bits).map(|digits| Decimal::new(bits.sign, digits))
}

/// Try the shortcut matching `pattern`.
pub fn try_fast_path(value: f64, pattern: PatternCategory, integer_limit: f64) -> Option<Decimal> {
    match pattern {
        PatternCategory::Integer => integer(value, integer_limit),
        PatternCategory::SimpleDecimal => fraction(FloatBits::from_f64(value)),
        PatternCategory::SpecialValue | PatternCategory::Scientific | PatternCategory::Complex => {
            None
        }
    }
}
