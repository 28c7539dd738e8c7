// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bit-level decomposition of a binary64 value.

use super::constants::{
    EXPONENT_BIAS, FRACTION_BITS, FRACTION_MASK, HIDDEN_BIT, MAX_BIASED_EXPONENT,
    MIN_BINARY_EXPONENT, SIGNIFICAND_BIAS, SIGN_MASK,
};

/// Category of a bit pattern. Every `u64` maps to exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatClass {
    Nan,
    Infinite,
    Zero,
    Subnormal,
    Normal,
}

/// The exact sign / exponent / fraction fields of a binary64 value.
///
/// Derived from the input on every call and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatBits {
    pub sign: bool,
    /// 11-bit biased exponent.
    pub biased_exponent: u32,
    /// 52-bit fraction field (without the hidden bit).
    pub mantissa: u64,
}

impl FloatBits {
    /// Split a raw bit pattern into its fields.
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            sign: bits & SIGN_MASK != 0,
            biased_exponent: ((bits >> FRACTION_BITS) as u32) & MAX_BIASED_EXPONENT,
            mantissa: bits & FRACTION_MASK,
        }
    }

    pub fn from_f64(value: f64) -> Self {
        Self::from_bits(value.to_bits())
    }

    /// Reassemble the raw bit pattern.
    pub const fn to_bits(self) -> u64 {
        (if self.sign { SIGN_MASK } else { 0 })
            | ((self.biased_exponent as u64) << FRACTION_BITS)
            | self.mantissa
    }

    pub const fn classify(self) -> FloatClass {
        if self.biased_exponent == MAX_BIASED_EXPONENT {
            if self.mantissa == 0 {
                FloatClass::Infinite
            } else {
                FloatClass::Nan
            }
        } else if self.biased_exponent == 0 {
            if self.mantissa == 0 {
                FloatClass::Zero
            } else {
                FloatClass::Subnormal
            }
        } else {
            FloatClass::Normal
        }
    }

    /// True for normal and subnormal values, i.e. everything with a nonzero magnitude
    /// and a finite decimal expansion.
    pub const fn is_finite_nonzero(self) -> bool {
        matches!(self.classify(), FloatClass::Normal | FloatClass::Subnormal)
    }

    /// Integer significand `c` such that `|value| = c * 2^binary_exponent()`.
    ///
    /// Includes the hidden bit for normal values.
    pub const fn significand(self) -> u64 {
        if self.biased_exponent == 0 {
            self.mantissa
        } else {
            self.mantissa | HIDDEN_BIT
        }
    }

    /// Exponent of the unit in the last place of [`significand`](Self::significand).
    pub const fn binary_exponent(self) -> i32 {
        if self.biased_exponent == 0 {
            MIN_BINARY_EXPONENT
        } else {
            self.biased_exponent as i32 - SIGNIFICAND_BIAS
        }
    }

    /// Exponent of the leading binary digit, `floor(log2(|value|))`.
    ///
    /// For subnormals this accounts for the leading zeros of the fraction, so that
    /// `5e-324` reports `-1074`.
    pub const fn unbiased_exponent(self) -> i32 {
        if self.biased_exponent == 0 {
            if self.mantissa == 0 {
                return 0;
            }
            let leading = 63 - self.mantissa.leading_zeros() as i32;
            MIN_BINARY_EXPONENT + leading
        } else {
            self.biased_exponent as i32 - EXPONENT_BIAS
        }
    }
}

impl From<f64> for FloatBits {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}
