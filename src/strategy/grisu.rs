// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Table-driven fast digit generation (Grisu3).
//!
//! The rounding interval is scaled by a cached 64-bit approximation of a power
//! of ten so that its upper end lands in `[4, 2^32)`, then digits are peeled off
//! the upper end until they fall inside the interval. Because every quantity
//! carries up to one ulp of error, the result is only accepted when it lies
//! inside a conservative sub-interval and is unambiguously the closest
//! candidate; otherwise `None` is returned and the caller falls back to the
//! exact generator.
//!
//! Reference: Florian Loitsch, "Printing Floating-Point Numbers Quickly and
//! Accurately with Integers", PLDI 2010.

use super::ShortestDigits;
use crate::classify::RangeClass;
use crate::float::constants::MAX_SIG_DIGITS;
use crate::float::Boundaries;
use crate::memo::{CachedPower, PowerTables};

/// Lower end of the binary window for the scaled upper bound.
pub const ALPHA: i16 = -60;
/// Upper end of the binary window for the scaled upper bound.
pub const GAMMA: i16 = -32;

/// Unnormalised 64-bit floating point `f * 2^e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fp {
    pub f: u64,
    pub e: i16,
}

impl Fp {
    /// Product rounded to the upper 64 bits.
    pub fn mul(self, other: Fp) -> Fp {
        let product = self.f as u128 * other.f as u128;
        let f = (product >> 64) as u64 + ((product >> 63) & 1) as u64;
        Fp {
            f,
            e: self.e + other.e + 64,
        }
    }

    /// Shift left until the top bit is set.
    pub fn normalize(self) -> Fp {
        debug_assert!(self.f != 0);
        let shift = self.f.leading_zeros();
        Fp {
            f: self.f << shift,
            e: self.e - shift as i16,
        }
    }

    /// Shift left so that the exponent becomes `e`. Must not lose bits.
    pub fn normalize_to(self, e: i16) -> Fp {
        let shift = self.e - e;
        debug_assert!(shift >= 0);
        let f = self.f << shift;
        debug_assert_eq!(f >> shift, self.f);
        Fp { f, e }
    }
}

/// Given `x > 0`, returns `(k, 10^k)` with `10^k <= x < 10^(k+1)`.
pub fn max_pow10_no_more_than(x: u32) -> (u8, u32) {
    debug_assert!(x > 0);
    let mut k = 0u8;
    let mut ten_k = 1u32;
    while k < 9 && x / 10 >= ten_k {
        ten_k *= 10;
        k += 1;
    }
    (k, ten_k)
}

/// Cached power that scales the upper end of `b` into `[ALPHA, GAMMA]`, taken
/// from the `class` table or a wider one, and the class that supplied it.
pub fn scaling_power(b: &Boundaries, class: RangeClass) -> (CachedPower, RangeClass) {
    let plus = Fp {
        f: b.mant + b.plus,
        e: b.exp,
    }
    .normalize();
    PowerTables::get().cached_power(class, ALPHA - plus.e - 64, GAMMA - plus.e - 64)
}

/// Shortest digits using `cached` (from [`scaling_power`]), or `None` when
/// the approximation cannot decide.
pub fn format_shortest_opt(b: &Boundaries, cached: CachedPower) -> Option<ShortestDigits> {
    assert!(b.mant > 0 && b.minus > 0 && b.plus > 0);
    assert!(b.mant + b.plus < (1 << 61));

    let plus = Fp {
        f: b.mant + b.plus,
        e: b.exp,
    }
    .normalize();
    let minus = Fp {
        f: b.mant - b.minus,
        e: b.exp,
    }
    .normalize_to(plus.e);
    let v = Fp {
        f: b.mant,
        e: b.exp,
    }
    .normalize_to(plus.e);

    debug_assert!(cached.e >= ALPHA - plus.e - 64 && cached.e <= GAMMA - plus.e - 64);
    let cached_k = cached.k;
    let cached = Fp {
        f: cached.f,
        e: cached.e,
    };

    // each product is within 1 ulp of the exact value
    let plus = plus.mul(cached);
    let minus = minus.mul(cached);
    let v = v.mul(cached);
    debug_assert_eq!(plus.e, minus.e);
    debug_assert_eq!(plus.e, v.e);

    // widen by one ulp on each side: digits are generated inside this unsafe
    // interval and later checked against the safe one
    let plus1 = plus.f + 1;
    let minus1 = minus.f - 1;
    let e = -plus.e as u32;
    let frac_mask = (1u64 << e) - 1;

    let plus1int = (plus1 >> e) as u32;
    let plus1frac = plus1 & frac_mask;

    let (max_kappa, max_ten_kappa) = max_pow10_no_more_than(plus1int);
    let exp = max_kappa as i16 - cached_k + 1;

    let delta1 = plus1 - minus1;
    let delta1frac = delta1 & frac_mask;

    let mut buf = [0u8; MAX_SIG_DIGITS];
    let mut i = 0;

    // integral part
    let mut ten_kappa = max_ten_kappa;
    let mut remainder = plus1int;
    loop {
        let q = remainder / ten_kappa;
        let r = remainder % ten_kappa;
        debug_assert!(q < 10);
        buf[i] = q as u8;
        i += 1;

        let plus1rem = ((r as u64) << e) + plus1frac;
        if plus1rem < delta1 {
            let ten_kappa = (ten_kappa as u64) << e;
            return round_and_weed(
                &mut buf[..i],
                exp,
                plus1rem,
                delta1,
                plus1 - v.f,
                ten_kappa,
                1,
            );
        }

        if i > max_kappa as usize {
            debug_assert_eq!(ten_kappa, 1);
            break;
        }
        ten_kappa /= 10;
        remainder = r;
    }

    // fractional part, by repeated multiplication
    let mut remainder = plus1frac;
    let mut threshold = delta1frac;
    let mut ulp = 1u64;
    loop {
        remainder *= 10;
        threshold *= 10;
        ulp *= 10;

        let q = remainder >> e;
        let r = remainder & frac_mask;
        debug_assert!(q < 10);
        if i == MAX_SIG_DIGITS {
            return None;
        }
        buf[i] = q as u8;
        i += 1;

        if r < threshold {
            return round_and_weed(
                &mut buf[..i],
                exp,
                r,
                threshold,
                (plus1 - v.f) * ulp,
                1 << e,
                ulp,
            );
        }
        remainder = r;
    }
}

/// Move the last digit down towards `v` and verify the candidate is both the
/// closest one and inside the safe interval.
///
/// All arguments share an implicit scale: `remainder = plus1 mod 10^kappa`,
/// `threshold = plus1 - minus1`, `plus1v = plus1 - v`, and `ulp` is one unit of
/// the scaled approximation error.
fn round_and_weed(
    buf: &mut [u8],
    exp: i16,
    remainder: u64,
    threshold: u64,
    plus1v: u64,
    ten_kappa: u64,
    ulp: u64,
) -> Option<ShortestDigits> {
    let (last, _) = buf.split_last_mut()?;

    let plus1v_down = plus1v + ulp;
    let plus1v_up = plus1v - ulp;

    // plus1w = plus1 - w, where w is the current candidate; it only grows
    let mut plus1w = remainder;
    while plus1w < plus1v_up
        && threshold - plus1w >= ten_kappa
        && (plus1w + ten_kappa < plus1v_up
            || plus1v_up - plus1w >= plus1w + ten_kappa - plus1v_up)
    {
        *last -= 1;
        debug_assert!(*last > 0);
        plus1w += ten_kappa;
    }

    // the same candidate must also be closest to v - 1 ulp
    if plus1w < plus1v_down
        && threshold - plus1w >= ten_kappa
        && (plus1w + ten_kappa < plus1v_down
            || plus1v_down - plus1w >= plus1w + ten_kappa - plus1v_down)
    {
        return None;
    }

    // reject anything within 2 ulp of either end of the unsafe interval
    if 2 * ulp <= plus1w && plus1w <= threshold - 4 * ulp {
        Some(ShortestDigits::new(buf, exp))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::FloatBits;
    use strum::IntoEnumIterator;

    fn grisu(v: f64, class: RangeClass) -> Option<ShortestDigits> {
        let b = Boundaries::new(FloatBits::from_f64(v));
        let (cached, _) = scaling_power(&b, class);
        format_shortest_opt(&b, cached)
    }

    #[test]
    fn test_scaling_power_reports_serving_table() {
        let b = |v: f64| Boundaries::new(FloatBits::from_f64(v));
        assert_eq!(scaling_power(&b(1.5), RangeClass::Compact).1, RangeClass::Compact);
        assert_eq!(scaling_power(&b(1e-250), RangeClass::Compact).1, RangeClass::Full);
        assert_eq!(scaling_power(&b(1e-250), RangeClass::Medium).1, RangeClass::Full);
        assert_eq!(scaling_power(&b(1e50), RangeClass::Compact).1, RangeClass::Medium);
    }

    #[test]
    fn test_max_pow10_no_more_than() {
        let mut prev = 1;
        for k in 1..10u8 {
            let ten_k = prev * 10;
            assert_eq!(max_pow10_no_more_than(ten_k - 1), (k - 1, prev));
            assert_eq!(max_pow10_no_more_than(ten_k), (k, ten_k));
            prev = ten_k;
        }
        assert_eq!(max_pow10_no_more_than(u32::MAX), (9, 1_000_000_000));
    }

    #[test]
    fn test_fp_mul_rounds_to_nearest() {
        let half = Fp { f: 1 << 63, e: 0 };
        let x = Fp { f: 3, e: 0 };
        // 3 * 2^63 / 2^64 = 1.5, rounds half up
        assert_eq!(x.mul(half), Fp { f: 2, e: 64 });
        let y = Fp { f: 2, e: -1 };
        assert_eq!(y.mul(half), Fp { f: 1, e: 63 });
    }

    #[test]
    fn test_normalize() {
        let fp = Fp { f: 1, e: 0 }.normalize();
        assert_eq!(fp, Fp { f: 1 << 63, e: -63 });
        assert_eq!(Fp { f: 1, e: 0 }.normalize_to(-4), Fp { f: 16, e: -4 });
    }

    #[test]
    fn test_simple_values() {
        let d = grisu(1.0, RangeClass::Compact).expect("1.0 is decided quickly");
        assert_eq!((d.digits(), d.exponent()), (&[1u8][..], 1));
        let d = grisu(0.3, RangeClass::Compact).expect("0.3 is decided quickly");
        assert_eq!((d.digits(), d.exponent()), (&[3u8][..], 0));
        if let Some(d) = grisu(f64::MAX, RangeClass::Full) {
            assert_eq!(d.digits(), &[1, 7, 9, 7, 6, 9, 3, 1, 3, 4, 8, 6, 2, 3, 1, 5, 7]);
            assert_eq!(d.exponent(), 309);
        }
    }

    #[test]
    fn test_every_table_agrees_when_decided() {
        for &v in &[0.1, 2.5, 123.456, 1e21, 6.02214076e23, 1e-7, 9007199254740993.0] {
            let answers: Vec<_> = RangeClass::iter().filter_map(|c| grisu(v, c)).collect();
            assert!(!answers.is_empty());
            for pair in answers.windows(2) {
                assert_eq!(pair[0], pair[1], "{}", v);
            }
        }
    }

    #[test]
    fn test_smallest_subnormal_gives_up_or_is_correct() {
        // 5e-324 has an open interval of width 2^-1074, so any answer must be "5"
        if let Some(d) = grisu(5e-324, RangeClass::Full) {
            assert_eq!((d.digits(), d.exponent()), (&[5u8][..], -323));
        }
    }
}
