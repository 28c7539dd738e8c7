// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact digit generation (Steele & White / Dragon4, free format).
//!
//! Works on exact big integers, so it always succeeds. It is only reached
//! when the fast generator cannot decide, which happens for well under one
//! percent of inputs.

use super::ShortestDigits;
use crate::float::constants::MAX_SIG_DIGITS;
use crate::float::Boundaries;
use crate::memo::Big;
use std::cmp::Ordering;

/// `k_0` with `10^(k_0 - 1) < mant * 2^exp <= 10^(k_0 + 1)`.
pub fn estimate_scaling_factor(mant: u64, exp: i16) -> i16 {
    // 2^(nbits-1) < mant <= 2^nbits
    let nbits = 64 - (mant - 1).leading_zeros() as i64;
    // 1292913986 = floor(2^32 * log10(2)), so this never overestimates
    (((nbits + exp as i64) * 1292913986) >> 32) as i16
}

/// `x mod scale`, returning the quotient digit. Requires `x < 16 * scale`.
fn div_rem_upto_16(x: &mut Big, scale: &Big, scale2: &Big, scale4: &Big, scale8: &Big) -> u8 {
    let mut d = 0;
    for (multiple, weight) in [(scale8, 8), (scale4, 4), (scale2, 2), (scale, 1)] {
        if *x >= *multiple {
            x.sub(multiple);
            d += weight;
        }
    }
    debug_assert!(*x < *scale);
    d
}

/// Round the digit sequence up by one unit in the last place.
/// Returns true when the carry ran off the front (all nines).
fn round_up(digits: &mut [u8]) -> bool {
    match digits.iter().rposition(|&d| d != 9) {
        Some(i) => {
            digits[i] += 1;
            digits[i + 1..].iter_mut().for_each(|d| *d = 0);
            false
        }
        None => {
            if let Some((first, rest)) = digits.split_first_mut() {
                *first = 1;
                rest.iter_mut().for_each(|d| *d = 0);
            }
            true
        }
    }
}

/// Shortest, closest digits of the value described by `b`.
pub fn format_shortest(b: &Boundaries) -> ShortestDigits {
    assert!(b.mant > 0 && b.minus > 0 && b.plus > 0);

    // With an inclusive interval a remainder equal to the bound still counts
    // as inside, so comparisons test `< Greater` instead of `< Equal`.
    let rounding = if b.inclusive {
        Ordering::Greater
    } else {
        Ordering::Equal
    };

    let mut k = estimate_scaling_factor(b.mant + b.plus, b.exp);

    // v = mant / scale, with mant, minus, plus and scale all integers
    let mut mant = Big::from_u64(b.mant);
    let mut minus = Big::from_u64(b.minus);
    let mut plus = Big::from_u64(b.plus);
    let mut scale = Big::from_small(1);
    if b.exp < 0 {
        scale.mul_pow2(-b.exp as usize);
    } else {
        mant.mul_pow2(b.exp as usize);
        minus.mul_pow2(b.exp as usize);
        plus.mul_pow2(b.exp as usize);
    }

    // divide by 10^k
    if k >= 0 {
        scale.mul_pow10(k as usize);
    } else {
        mant.mul_pow10(-k as usize);
        minus.mul_pow10(-k as usize);
        plus.mul_pow10(-k as usize);
    }

    // fix up the estimate: afterwards scale < mant + plus <= 10 * scale
    if scale.cmp(mant.clone().add(&plus)) < rounding {
        k += 1;
    } else {
        mant.mul_small(10);
        minus.mul_small(10);
        plus.mul_small(10);
    }

    let mut scale2 = scale.clone();
    scale2.mul_pow2(1);
    let mut scale4 = scale.clone();
    scale4.mul_pow2(2);
    let mut scale8 = scale.clone();
    scale8.mul_pow2(3);

    let mut buf = [0u8; MAX_SIG_DIGITS];
    let mut len = 0;
    let (down, up) = loop {
        let d = div_rem_upto_16(&mut mant, &scale, &scale2, &scale4, &scale8);
        debug_assert!(d < 10);
        assert!(len < MAX_SIG_DIGITS, "exact generator exceeded 17 digits");
        buf[len] = d;
        len += 1;

        // down: truncating here stays inside the interval
        // up: rounding the last digit up stays inside the interval
        let down = mant.cmp(&minus) < rounding;
        let up = scale.cmp(mant.clone().add(&plus)) < rounding;
        if down || up {
            break (down, up);
        }

        mant.mul_small(10);
        minus.mul_small(10);
        plus.mul_small(10);
    };

    // both candidates valid: take the closer one, ties to even
    let round = match (down, up) {
        (_, false) => false,
        (false, true) => true,
        (true, true) => {
            mant.mul_pow2(1);
            match mant.cmp(&scale) {
                Ordering::Less => false,
                Ordering::Greater => true,
                Ordering::Equal => buf[len - 1] % 2 == 1,
            }
        }
    };
    if round && round_up(&mut buf[..len]) {
        k += 1;
    }

    ShortestDigits::new(&buf[..len], k)
}
