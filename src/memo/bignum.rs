// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-width unsigned big integer.
//!
//! Used for the two places where 64-bit arithmetic is not enough: generating the
//! power-of-ten tables and the exact digit generator. Both stay well below
//! `LIMBS * 32` bits for every binary64 input (the largest intermediate value is
//! about `2^55 * 10^324 < 2^1133`), so operations assert instead of growing.

use std::cmp::Ordering;

/// Number of 32-bit limbs.
pub const LIMBS: usize = 48;

/// `5^13`, the largest power of five that fits in a `u32`.
const POW5_13: u32 = 1_220_703_125;

/// Little-endian base-2^32 integer.
///
/// Invariant: `base[size..]` is all zeros. `size` may overstate the length when
/// the top limbs became zero through subtraction; comparisons never rely on it.
#[derive(Clone)]
pub struct Big {
    size: usize,
    base: [u32; LIMBS],
}

impl Big {
    pub fn zero() -> Self {
        Self {
            size: 0,
            base: [0; LIMBS],
        }
    }

    pub fn from_small(v: u32) -> Self {
        let mut big = Self::zero();
        if v != 0 {
            big.base[0] = v;
            big.size = 1;
        }
        big
    }

    pub fn from_u64(v: u64) -> Self {
        let mut big = Self::zero();
        big.base[0] = v as u32;
        big.base[1] = (v >> 32) as u32;
        big.size = if big.base[1] != 0 {
            2
        } else if big.base[0] != 0 {
            1
        } else {
            0
        };
        big
    }

    pub fn is_zero(&self) -> bool {
        self.base[..self.size].iter().all(|&limb| limb == 0)
    }

    /// Number of significant bits; zero for zero.
    pub fn bit_length(&self) -> usize {
        match self.base[..self.size].iter().rposition(|&limb| limb != 0) {
            Some(top) => top * 32 + (32 - self.base[top].leading_zeros() as usize),
            None => 0,
        }
    }

    pub fn get_bit(&self, i: usize) -> bool {
        let limb = i / 32;
        limb < LIMBS && (self.base[limb] >> (i % 32)) & 1 == 1
    }

    /// The `n <= 128` most significant bits, left-aligned: for a value with
    /// `bit_length() = l` this is `floor(self * 2^(n - l))`.
    pub fn top_bits(&self, n: usize) -> u128 {
        assert!(n <= 128);
        let len = self.bit_length();
        let mut out = 0u128;
        for i in 0..n {
            out <<= 1;
            if i < len && self.get_bit(len - 1 - i) {
                out |= 1;
            }
        }
        out
    }

    /// Value as `u128`.
    ///
    /// # Panics
    ///
    /// Panics if the value needs more than 128 bits.
    #[cfg(test)]
    fn to_u128(&self) -> u128 {
        assert!(self.bit_length() <= 128, "big integer does not fit in u128");
        self.base[..4]
            .iter()
            .rev()
            .fold(0u128, |acc, &limb| (acc << 32) | limb as u128)
    }

    pub fn add<'a>(&'a mut self, other: &Big) -> &'a mut Self {
        let size = self.size.max(other.size);
        let mut carry = false;
        for i in 0..size {
            let (sum, c1) = self.base[i].overflowing_add(other.base[i]);
            let (sum, c2) = sum.overflowing_add(carry as u32);
            self.base[i] = sum;
            carry = c1 || c2;
        }
        self.size = size;
        if carry {
            self.push_limb(1);
        }
        self
    }

    pub fn add_small(&mut self, v: u32) -> &mut Self {
        let mut carry = v;
        let mut i = 0;
        while carry != 0 {
            if i == self.size {
                self.push_limb(carry);
                break;
            }
            let (sum, c) = self.base[i].overflowing_add(carry);
            self.base[i] = sum;
            carry = c as u32;
            i += 1;
        }
        self
    }

    /// Subtract `other`, which must not exceed `self`.
    pub fn sub<'a>(&'a mut self, other: &Big) -> &'a mut Self {
        let size = self.size.max(other.size);
        let mut borrow = false;
        for i in 0..size {
            let (diff, b1) = self.base[i].overflowing_sub(other.base[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u32);
            self.base[i] = diff;
            borrow = b1 || b2;
        }
        assert!(!borrow, "big integer subtraction underflow");
        self.size = size;
        self.trim();
        self
    }

    pub fn mul_small(&mut self, other: u32) -> &mut Self {
        let mut carry = 0u64;
        for limb in &mut self.base[..self.size] {
            let v = (*limb as u64) * (other as u64) + carry;
            *limb = v as u32;
            carry = v >> 32;
        }
        if carry > 0 {
            self.push_limb(carry as u32);
        }
        self
    }

    pub fn mul_pow2(&mut self, bits: usize) -> &mut Self {
        self.trim();
        if self.size == 0 {
            return self;
        }
        let digits = bits / 32;
        let bits = bits % 32;
        assert!(self.size + digits <= LIMBS, "big integer overflow");

        for i in (0..self.size).rev() {
            self.base[i + digits] = self.base[i];
        }
        for limb in &mut self.base[..digits] {
            *limb = 0;
        }
        let mut size = self.size + digits;

        if bits > 0 {
            let overflow = self.base[size - 1] >> (32 - bits);
            for i in (digits + 1..size).rev() {
                self.base[i] = (self.base[i] << bits) | (self.base[i - 1] >> (32 - bits));
            }
            self.base[digits] <<= bits;
            if overflow > 0 {
                assert!(size < LIMBS, "big integer overflow");
                self.base[size] = overflow;
                size += 1;
            }
        }
        self.size = size;
        self
    }

    pub fn mul_pow5(&mut self, mut e: usize) -> &mut Self {
        while e >= 13 {
            self.mul_small(POW5_13);
            e -= 13;
        }
        let rest = (0..e).fold(1u32, |acc, _| acc * 5);
        self.mul_small(rest)
    }

    pub fn mul_pow10(&mut self, e: usize) -> &mut Self {
        self.mul_pow5(e);
        self.mul_pow2(e)
    }

    /// Long division, one bit at a time. Returns `(quotient, remainder)`.
    pub fn div_rem(&self, divisor: &Big) -> (Big, Big) {
        assert!(!divisor.is_zero(), "big integer division by zero");
        let mut quotient = Big::zero();
        let mut remainder = Big::zero();
        for i in (0..self.bit_length()).rev() {
            remainder.mul_pow2(1);
            if self.get_bit(i) {
                remainder.add_small(1);
            }
            if remainder >= *divisor {
                remainder.sub(divisor);
                quotient.set_bit(i);
            }
        }
        (quotient, remainder)
    }

    fn set_bit(&mut self, i: usize) {
        let limb = i / 32;
        assert!(limb < LIMBS, "big integer overflow");
        self.base[limb] |= 1 << (i % 32);
        self.size = self.size.max(limb + 1);
    }

    fn push_limb(&mut self, limb: u32) {
        assert!(self.size < LIMBS, "big integer overflow");
        self.base[self.size] = limb;
        self.size += 1;
    }

    fn trim(&mut self) {
        while self.size > 0 && self.base[self.size - 1] == 0 {
            self.size -= 1;
        }
    }
}

impl PartialEq for Big {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl Eq for Big {}

impl PartialOrd for Big {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Big {
    fn cmp(&self, other: &Self) -> Ordering {
        let size = self.size.max(other.size);
        self.base[..size]
            .iter()
            .rev()
            .cmp(other.base[..size].iter().rev())
    }
}

impl std::fmt::Debug for Big {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.size.max(1);
        write!(f, "{:#x}", self.base[size - 1])?;
        for limb in self.base[..size - 1].iter().rev() {
            write!(f, "_{:08x}", limb)?;
        }
        Ok(())
    }
}
