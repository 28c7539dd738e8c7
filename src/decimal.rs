// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Conversion results and their textual form.
//!
//! ```text
//! NaN | +Inf | -Inf | 0 | -0 | -?digits(.digits)?
//! ```
//!
//! Finite values never use exponent notation: large magnitudes are padded
//! with zeros (`1e21` prints as `1000000000000000000000`) and small ones get a
//! `0.000...` prefix.

use crate::float::{FloatBits, FloatClass};
use crate::strategy::ShortestDigits;
use std::fmt;

/// Inputs that bypass digit generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialValue {
    Nan,
    PosInfinity,
    NegInfinity,
    Zero { negative: bool },
}

impl SpecialValue {
    /// The special value for `bits`, or `None` for finite nonzero inputs.
    pub fn detect(bits: FloatBits) -> Option<SpecialValue> {
        match bits.classify() {
            FloatClass::Nan => Some(SpecialValue::Nan),
            FloatClass::Infinite if bits.sign => Some(SpecialValue::NegInfinity),
            FloatClass::Infinite => Some(SpecialValue::PosInfinity),
            FloatClass::Zero => Some(SpecialValue::Zero {
                negative: bits.sign,
            }),
            FloatClass::Normal | FloatClass::Subnormal => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialValue::Nan => "NaN",
            SpecialValue::PosInfinity => "+Inf",
            SpecialValue::NegInfinity => "-Inf",
            SpecialValue::Zero { negative: false } => "0",
            SpecialValue::Zero { negative: true } => "-0",
        }
    }
}

/// A finite nonzero value: `(-1)^negative * 0.d1...dn * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    negative: bool,
    digits: ShortestDigits,
}

impl Decimal {
    pub fn new(negative: bool, digits: ShortestDigits) -> Self {
        Self { negative, digits }
    }

    /// Exact decimal for a nonzero integer magnitude.
    ///
    /// # Panics
    ///
    /// Panics if `magnitude` has more than 17 significant digits.
    pub(crate) fn from_integer(negative: bool, magnitude: u64) -> Self {
        debug_assert!(magnitude != 0);
        let mut buf = [0u8; 20];
        let mut n = magnitude;
        let mut len = 0;
        while n > 0 {
            buf[len] = (n % 10) as u8;
            n /= 10;
            len += 1;
        }
        buf[..len].reverse();
        Self::new(negative, ShortestDigits::new(&buf[..len], len as i16))
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn digits(&self) -> &[u8] {
        self.digits.digits()
    }

    /// Position of the decimal point relative to the first digit.
    pub fn exponent(&self) -> i32 {
        self.digits.exponent() as i32
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.digits().len() + 8);
        if self.negative {
            out.push('-');
        }
        let digits = self.digits();
        let n = digits.len() as i32;
        let exp = self.exponent();
        let push_digits = |out: &mut String, ds: &[u8]| {
            out.extend(ds.iter().map(|&d| char::from(b'0' + d)));
        };

        if exp <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-exp) as usize));
            push_digits(&mut out, digits);
        } else if exp < n {
            let (int, frac) = digits.split_at(exp as usize);
            push_digits(&mut out, int);
            out.push('.');
            push_digits(&mut out, frac);
        } else {
            push_digits(&mut out, digits);
            out.extend(std::iter::repeat('0').take((exp - n) as usize));
        }
        f.write_str(&out)
    }
}

/// Outcome of converting one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalResult {
    Finite(Decimal),
    Special(SpecialValue),
}

impl fmt::Display for DecimalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalResult::Finite(d) => fmt::Display::fmt(d, f),
            DecimalResult::Special(s) => f.write_str(s.as_str()),
        }
    }
}
