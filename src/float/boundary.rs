// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Rounding interval of a finite nonzero binary64 value.
//!
//! Every decimal strictly between the two half-way points to the neighbouring
//! doubles parses back to the value itself. The half-way points themselves parse
//! back to the value only when its significand is even (round-half-even), so the
//! interval is closed for even significands and open for odd ones.
//!
//! ```text
//!   regular spacing                binade boundary (fraction == 0)
//!
//!   v-   lo   v   hi   v+          v-  lo  v       hi       v+
//!   |----|----|----|----|          |---|---|-------|-------|
//!        1    1                        1       2
//! ```
//!
//! At a binade boundary the neighbour below is twice as close as the one above,
//! except in the lowest normal binade, whose lower neighbour is the largest
//! subnormal at the same spacing.

use super::bits::FloatBits;

/// Scaled integer description of the rounding interval.
///
/// value = `mant * 2^exp`, lower bound = `(mant - minus) * 2^exp`,
/// upper bound = `(mant + plus) * 2^exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    pub mant: u64,
    pub minus: u64,
    pub plus: u64,
    pub exp: i16,
    /// The lower neighbour is half as far away as the upper one.
    pub lower_closer: bool,
    /// Both half-way points round back to the value.
    pub inclusive: bool,
}

impl Boundaries {
    /// Compute the interval for a finite nonzero value.
    ///
    /// # Panics
    ///
    /// Panics for zero, infinities and NaN; those never reach digit generation.
    pub fn new(bits: FloatBits) -> Self {
        assert!(
            bits.is_finite_nonzero(),
            "rounding interval requested for non-finite or zero pattern {:#018x}",
            bits.to_bits()
        );

        let c = bits.significand();
        let q = bits.binary_exponent() as i16;
        let inclusive = c % 2 == 0;

        if bits.mantissa == 0 && bits.biased_exponent > 1 {
            // neighbours: (2c - 1, q - 1) -- (c, q) -- (c + 1, q)
            Self {
                mant: c << 2,
                minus: 1,
                plus: 2,
                exp: q - 2,
                lower_closer: true,
                inclusive,
            }
        } else {
            // neighbours: (c - 1, q) -- (c, q) -- (c + 1, q)
            Self {
                mant: c << 1,
                minus: 1,
                plus: 1,
                exp: q - 1,
                lower_closer: false,
                inclusive,
            }
        }
    }

    /// Whether the lower half-way point itself round-trips.
    pub fn lower_closed(&self) -> bool {
        self.inclusive
    }

    /// Whether the upper half-way point itself round-trips.
    pub fn upper_closed(&self) -> bool {
        self.inclusive
    }

    /// Scaled lower bound `mant - minus`.
    pub fn lower(&self) -> u64 {
        self.mant - self.minus
    }

    /// Scaled upper bound `mant + plus`.
    pub fn upper(&self) -> u64 {
        self.mant + self.plus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries(v: f64) -> Boundaries {
        Boundaries::new(FloatBits::from_f64(v))
    }

    #[test]
    fn test_regular_interval_is_symmetric() {
        let b = boundaries(1.5);
        assert!(!b.lower_closer);
        assert_eq!(b.minus, b.plus);
        assert_eq!(b.mant, FloatBits::from_f64(1.5).significand() << 1);
    }

    #[test]
    fn test_power_of_two_has_closer_lower_neighbour() {
        let b = boundaries(1.0);
        assert!(b.lower_closer);
        assert_eq!((b.minus, b.plus), (1, 2));
        assert_eq!(b.mant, 1u64 << 54);
        assert_eq!(b.exp, -54);
        assert!(b.inclusive);
    }

    #[test]
    fn test_min_normal_keeps_uniform_spacing() {
        // The largest subnormal is exactly one ulp below the minimum normal.
        let b = boundaries(f64::MIN_POSITIVE);
        assert!(!b.lower_closer);
        assert_eq!((b.minus, b.plus), (1, 1));
    }

    #[test]
    fn test_next_binade_above_min_normal_is_asymmetric() {
        let b = boundaries(f64::MIN_POSITIVE * 2.0);
        assert!(b.lower_closer);
    }

    #[test]
    fn test_subnormal_interval() {
        let b = boundaries(5e-324);
        assert_eq!(b.mant, 2);
        assert_eq!(b.exp, -1075);
        assert_eq!(b.lower(), 1);
        assert_eq!(b.upper(), 3);
        assert!(!b.inclusive);
    }

    #[test]
    fn test_inclusive_follows_even_significand() {
        // 1 + 2^-52 has an odd significand.
        let odd = f64::from_bits(1.0f64.to_bits() + 1);
        assert!(!boundaries(odd).inclusive);
        assert!(!boundaries(odd).lower_closed());
        let even = f64::from_bits(1.0f64.to_bits() + 2);
        assert!(boundaries(even).inclusive);
        assert!(boundaries(even).upper_closed());
    }

    #[test]
    fn test_sign_does_not_change_interval() {
        assert_eq!(boundaries(-0.1), boundaries(0.1));
    }

    #[test]
    #[should_panic]
    fn test_zero_has_no_interval() {
        boundaries(0.0);
    }
}
