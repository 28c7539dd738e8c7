// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pattern classification of inputs.
//!
//! The category picks a code path and a statistics bucket. It never changes the
//! output: every fast path produces exactly what the general digit generator
//! would.

use crate::config::ClassifierConfig;
use crate::float::{FloatBits, FloatClass};
use crate::strategy::ShortestDigits;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

/// Shape of an input value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCountMacro, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
pub enum PatternCategory {
    /// Zero, infinities and NaN.
    SpecialValue,
    /// Integral and small enough to print exactly.
    Integer,
    /// A few fractional digits and a moderate magnitude, e.g. `0.25` or `19.99`.
    SimpleDecimal,
    /// Very large or very small magnitude.
    Scientific,
    /// Everything else, e.g. `1/3` or pi.
    Complex,
}

impl PatternCategory {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Fractions common enough to keep their digits precomputed: `(value, digits, exponent)`.
const COMMON_FRACTIONS: [(f64, &[u8], i16); 8] = [
    (0.5, &[5], 0),
    (0.25, &[2, 5], 0),
    (0.75, &[7, 5], 0),
    (0.2, &[2], 0),
    (0.1, &[1], 0),
    (0.125, &[1, 2, 5], 0),
    (0.01, &[1], -1),
    (0.001, &[1], -2),
];

/// Precomputed digits when `|value|` is one of the common fractions.
pub fn common_fraction(bits: FloatBits) -> Option<ShortestDigits> {
    let magnitude = FloatBits { sign: false, ..bits }.to_bits();
    COMMON_FRACTIONS
        .iter()
        .find(|(v, _, _)| v.to_bits() == magnitude)
        .map(|&(_, digits, exponent)| ShortestDigits::new(digits, exponent))
}

/// Deterministic classifier with configurable thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternClassifier {
    integer_limit: f64,
    min_simple: f64,
    max_fraction_digits: u32,
    scientific_low: f64,
    scientific_high: f64,
}

impl PatternClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            integer_limit: config.integer_limit,
            min_simple: config.min_simple,
            max_fraction_digits: config.max_fraction_digits,
            scientific_low: config.scientific_low,
            scientific_high: config.scientific_high,
        }
    }

    pub fn integer_limit(&self) -> f64 {
        self.integer_limit
    }

    pub fn classify(&self, value: f64) -> PatternCategory {
        let bits = FloatBits::from_f64(value);
        if !bits.is_finite_nonzero() {
            debug_assert!(matches!(
                bits.classify(),
                FloatClass::Zero | FloatClass::Infinite | FloatClass::Nan
            ));
            return PatternCategory::SpecialValue;
        }

        let magnitude = value.abs();
        if value == value.trunc() && magnitude <= self.integer_limit {
            return PatternCategory::Integer;
        }
        if common_fraction(bits).is_some() || self.is_simple(value, magnitude) {
            return PatternCategory::SimpleDecimal;
        }
        if magnitude < self.scientific_low || magnitude > self.scientific_high {
            return PatternCategory::Scientific;
        }
        PatternCategory::Complex
    }

    /// True when a few fractional decimal digits describe the value exactly
    /// as far as binary64 can tell.
    fn is_simple(&self, value: f64, magnitude: f64) -> bool {
        if magnitude < self.min_simple || magnitude >= self.integer_limit {
            return false;
        }
        let mut scale = 1.0;
        for _ in 1..=self.max_fraction_digits {
            scale *= 10.0;
            if (value * scale).round() / scale == value {
                return true;
            }
        }
        false
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    fn classify(v: f64) -> PatternCategory {
        PatternClassifier::default().classify(v)
    }

    #[test]
    fn test_special_values() {
        for v in [0.0, -0.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(classify(v), PatternCategory::SpecialValue);
        }
    }

    #[test]
    fn test_integers() {
        for v in [1.0, -1.0, 42.0, 1e15, -1e15, 123456789.0] {
            assert_eq!(classify(v), PatternCategory::Integer, "{}", v);
        }
        // integral but past the limit
        assert_eq!(classify(1e16), PatternCategory::Scientific);
    }

    #[test]
    fn test_simple_decimals() {
        for v in [0.5, -0.25, 0.1, 0.01, 0.001, 3.14, 19.99, 1234.5678] {
            assert_eq!(classify(v), PatternCategory::SimpleDecimal, "{}", v);
        }
    }

    #[test]
    fn test_scientific() {
        for v in [1e-7, 5e-324, 1e20, -2.5e-10, f64::MAX] {
            assert_eq!(classify(v), PatternCategory::Scientific, "{}", v);
        }
    }

    #[test]
    fn test_complex() {
        for v in [std::f64::consts::PI, 1.0 / 3.0, 0.1 + 0.2, 2.0f64.sqrt()] {
            assert_eq!(classify(v), PatternCategory::Complex, "{}", v);
        }
    }

    #[test]
    fn test_common_fraction_lookup_ignores_sign() {
        let half = common_fraction(FloatBits::from_f64(-0.5)).expect("0.5 is common");
        assert_eq!((half.digits(), half.exponent()), (&[5u8][..], 0));
        let milli = common_fraction(FloatBits::from_f64(0.001)).expect("0.001 is common");
        assert_eq!((milli.digits(), milli.exponent()), (&[1u8][..], -2));
        assert!(common_fraction(FloatBits::from_f64(0.3)).is_none());
    }

    #[test]
    fn test_names_cover_every_category() {
        let names: Vec<_> = PatternCategory::iter().map(PatternCategory::name).collect();
        assert_eq!(names.len(), PatternCategory::COUNT);
        assert_eq!(names[0], "SpecialValue");
        assert_eq!(names[4], "Complex");
    }
}
