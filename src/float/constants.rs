// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! IEEE-754 binary64 layout constants.
//!
//! ```text
//! bit 63      sign
//! bits 62-52  biased exponent (11 bits)
//! bits 51-0   fraction (52 bits), the significand's leading 1 is implicit for normals
//! ```

/// Number of explicitly stored fraction bits.
pub const FRACTION_BITS: u32 = 52;

/// Number of exponent bits.
pub const EXPONENT_BITS: u32 = 11;

/// Exponent bias: a biased exponent `b` of a normal value means `2^(b - 1023)`.
pub const EXPONENT_BIAS: i32 = 1023;

/// The implicit leading bit of a normal significand.
pub const HIDDEN_BIT: u64 = 1 << FRACTION_BITS;

pub const FRACTION_MASK: u64 = HIDDEN_BIT - 1;

pub const SIGN_MASK: u64 = 1 << 63;

/// Biased exponent of infinities and NaNs.
pub const MAX_BIASED_EXPONENT: u32 = (1 << EXPONENT_BITS) - 1;

/// Exponent of the unit in the last place of a significand with biased exponent `b`
/// is `b - SIGNIFICAND_BIAS`.
pub const SIGNIFICAND_BIAS: i32 = EXPONENT_BIAS + FRACTION_BITS as i32;

/// Exponent of the unit in the last place of subnormals (and of the minimum normal binade).
pub const MIN_BINARY_EXPONENT: i32 = 1 - SIGNIFICAND_BIAS;

/// Upper bound on the number of significant decimal digits of a shortest representation.
pub const MAX_SIG_DIGITS: usize = 17;

/// `floor(e * log10(2))`, exact for `|e| <= 1650`.
pub const fn floor_log10_pow2(e: i32) -> i32 {
    (e * 78913) >> 18
}

/// `floor(k * log2(10))`, exact for `|k| <= 1233`.
pub const fn floor_log2_pow10(k: i32) -> i32 {
    (k * 1741647) >> 19
}
