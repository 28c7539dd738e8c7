// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Shortest digit generation.
//!
//! [`format_shortest`] runs the table-driven [`grisu`] generator with the
//! power-of-ten table chosen by the range selector and falls back to the exact
//! [`dragon`] generator when the fast one cannot decide. Both produce the same
//! answer whenever the fast one answers at all, so the choice of table never
//! changes the output.

pub mod dragon;
pub mod grisu;

use crate::classify::RangeClass;
use crate::float::constants::MAX_SIG_DIGITS;
use crate::float::Boundaries;

/// Which generator produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitGenerator {
    Fast,
    Exact,
}

/// Significant digits `d1 d2 ... dn` (values 0-9, no leading or trailing
/// zero) and the decimal point position: the value is `0.d1...dn * 10^exponent`.
#[derive(Clone, Copy)]
pub struct ShortestDigits {
    digits: [u8; MAX_SIG_DIGITS],
    len: u8,
    exponent: i16,
}

impl ShortestDigits {
    /// Build from raw digits, dropping trailing zeros.
    pub fn new(digits: &[u8], exponent: i16) -> Self {
        let len = digits.iter().rposition(|&d| d != 0).map_or(0, |i| i + 1);
        assert!(len > 0 && len <= MAX_SIG_DIGITS, "bad digit count {}", len);
        debug_assert!(digits[0] != 0 && digits.iter().all(|&d| d < 10));
        let mut buf = [0u8; MAX_SIG_DIGITS];
        buf[..len].copy_from_slice(&digits[..len]);
        Self {
            digits: buf,
            len: len as u8,
            exponent,
        }
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len as usize]
    }

    pub fn exponent(&self) -> i16 {
        self.exponent
    }
}

impl PartialEq for ShortestDigits {
    fn eq(&self, other: &Self) -> bool {
        self.digits() == other.digits() && self.exponent == other.exponent
    }
}

impl Eq for ShortestDigits {}

impl std::fmt::Debug for ShortestDigits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0.")?;
        for d in self.digits() {
            write!(f, "{}", d)?;
        }
        write!(f, "e{}", self.exponent)
    }
}

/// Result of [`format_shortest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortest {
    pub digits: ShortestDigits,
    pub generator: DigitGenerator,
    /// Power table that served the lookup; wider than the requested one when
    /// the requested table does not reach the input's exponent.
    pub table: RangeClass,
}

/// Shortest, closest digits for the interval `b`, consulting the `class` table first.
pub fn format_shortest(b: &Boundaries, class: RangeClass) -> Shortest {
    let (cached, table) = grisu::scaling_power(b, class);
    let (digits, generator) = match grisu::format_shortest_opt(b, cached) {
        Some(digits) => (digits, DigitGenerator::Fast),
        None => (dragon::format_shortest(b), DigitGenerator::Exact),
    };
    Shortest {
        digits,
        generator,
        table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::FloatBits;
    use strum::IntoEnumIterator;

    fn boundaries(v: f64) -> Boundaries {
        Boundaries::new(FloatBits::from_f64(v))
    }

    #[test]
    fn test_new_trims_trailing_zeros() {
        let d = ShortestDigits::new(&[1, 2, 0, 0], 3);
        assert_eq!(d.digits(), &[1, 2]);
        assert_eq!(d.exponent(), 3);
        assert_eq!(format!("{:?}", d), "0.12e3");
    }

    #[test]
    fn test_fast_and_exact_agree_on_every_table() {
        let mut fast = 0;
        let mut bits = 0x3ff0_0000_0000_0000u64;
        for _ in 0..2000 {
            // cheap deterministic walk across many binades
            bits = bits
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let v = f64::from_bits(bits >> 1);
            if !v.is_finite() || v == 0.0 {
                continue;
            }
            let b = boundaries(v);
            let exact = dragon::format_shortest(&b);
            for class in RangeClass::iter() {
                let shortest = format_shortest(&b, class);
                assert_eq!(shortest.digits, exact, "{:e} via {:?}", v, class);
                assert!(shortest.table >= class);
                if shortest.generator == DigitGenerator::Fast {
                    fast += 1;
                }
            }
        }
        // the fast path decides the overwhelming majority
        assert!(fast > 5000, "fast path only decided {} of 6000", fast);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 2^50 + 0.25 sits exactly between ...24.2 and ...24.3, both inside its interval
        let d = format_shortest(&boundaries(1125899906842624.25), RangeClass::Compact).digits;
        assert_eq!(d.digits(), &[1, 1, 2, 5, 8, 9, 9, 9, 0, 6, 8, 4, 2, 6, 2, 4, 2]);
        assert_eq!(d.exponent(), 16);
        let d = format_shortest(&boundaries(1125899906842624.75), RangeClass::Compact).digits;
        assert_eq!(d.digits(), &[1, 1, 2, 5, 8, 9, 9, 9, 0, 6, 8, 4, 2, 6, 2, 4, 8]);
    }
}
