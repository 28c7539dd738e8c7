// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cached 64-bit approximations of powers of ten.
//!
//! Each entry `(f, e, k)` satisfies `f * 2^e ≈ 10^k` with `f` normalised
//! (`2^63 <= f < 2^64`) and rounded to nearest. Three tables of different
//! granularity cover different exponent ranges:
//!
//! | table   | k range        | step | entries |
//! |---------|----------------|------|---------|
//! | Compact | -24 ..= 32     | 1    | 57      |
//! | Medium  | -108 ..= 112   | 4    | 56      |
//! | Full    | -308 ..= 332   | 8    | 81      |
//!
//! The tables are generated once, on first use, with exact big-integer
//! arithmetic and shared read-only by every engine in the process.

use super::bignum::Big;
use crate::classify::RangeClass;
use crate::float::constants::floor_log10_pow2;
use std::sync::OnceLock;
use tracing::debug;

/// One cached power of ten: `f * 2^e ≈ 10^k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedPower {
    pub f: u64,
    pub e: i16,
    pub k: i16,
}

impl CachedPower {
    /// Compute the correctly rounded 64-bit approximation of `10^k`.
    pub fn compute(k: i16) -> Self {
        let (value, base_exp) = if k >= 0 {
            let mut v = Big::from_small(1);
            v.mul_pow10(k as usize);
            (v, 0i32)
        } else {
            // 10^k = 2^-p * (2^p / 10^-k); choose p so the quotient has at least 65 bits.
            let mut divisor = Big::from_small(1);
            divisor.mul_pow10(-(k as i32) as usize);
            let p = divisor.bit_length() + 65;
            let mut dividend = Big::from_small(1);
            dividend.mul_pow2(p);
            let (quotient, _) = dividend.div_rem(&divisor);
            (quotient, -(p as i32))
        };

        let len = value.bit_length() as i32;
        let rounded = (value.top_bits(65) + 1) >> 1;
        let (f, e) = if rounded >> 64 != 0 {
            (1u64 << 63, base_exp + len - 63)
        } else {
            (rounded as u64, base_exp + len - 64)
        };
        Self {
            f,
            e: e as i16,
            k,
        }
    }
}

/// Evenly spaced cached powers `10^first_k, 10^(first_k + step), ...`.
#[derive(Debug, Clone)]
pub struct PowerTable {
    class: RangeClass,
    first_k: i16,
    step: i16,
    entries: Vec<CachedPower>,
}

impl PowerTable {
    pub fn generate(class: RangeClass, first_k: i16, last_k: i16, step: i16) -> Self {
        assert!(step > 0 && first_k <= last_k);
        let entries = (first_k..=last_k)
            .step_by(step as usize)
            .map(CachedPower::compute)
            .collect();
        Self {
            class,
            first_k,
            step,
            entries,
        }
    }

    pub fn class(&self) -> RangeClass {
        self.class
    }

    pub fn entries(&self) -> &[CachedPower] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest and largest `k` in the table.
    pub fn k_range(&self) -> (i16, i16) {
        let last = self.entries.last().map_or(self.first_k, |p| p.k);
        (self.first_k, last)
    }

    /// Find the entry with the smallest `k` whose binary exponent lies in
    /// `[min_e, max_e]`, or `None` when the table does not reach that far.
    pub fn lookup(&self, min_e: i16, max_e: i16) -> Option<CachedPower> {
        // e(k) = floor(k * log2(10)) - 63, so e >= min_e needs k >= (min_e + 63) * log10(2).
        let target = min_e as i32 + 63;
        let k_min = if target == 0 {
            0
        } else {
            floor_log10_pow2(target) + 1
        };
        let first = self.first_k as i32;
        let step = self.step as i32;
        let estimate = if k_min <= first {
            0
        } else {
            ((k_min - first + step - 1) / step) as usize
        };

        let mut idx = estimate.min(self.entries.len());
        while idx > 0 && self.entries[idx - 1].e >= min_e {
            idx -= 1;
        }
        while idx < self.entries.len() && self.entries[idx].e < min_e {
            idx += 1;
        }

        let entry = *self.entries.get(idx)?;
        (entry.e <= max_e).then_some(entry)
    }
}

/// The three process-wide tables.
#[derive(Debug)]
pub struct PowerTables {
    compact: PowerTable,
    medium: PowerTable,
    full: PowerTable,
}

static TABLES: OnceLock<PowerTables> = OnceLock::new();

impl PowerTables {
    /// Shared tables, generated on first call.
    pub fn get() -> &'static PowerTables {
        TABLES.get_or_init(PowerTables::generate)
    }

    fn generate() -> Self {
        let tables = Self {
            compact: PowerTable::generate(RangeClass::Compact, -24, 32, 1),
            medium: PowerTable::generate(RangeClass::Medium, -108, 112, 4),
            full: PowerTable::generate(RangeClass::Full, -308, 332, 8),
        };
        for table in [&tables.compact, &tables.medium, &tables.full] {
            let (lo, hi) = table.k_range();
            debug!(
                class = table.class().name(),
                entries = table.len(),
                k_lo = lo,
                k_hi = hi,
                "power-of-ten table ready"
            );
        }
        tables
    }

    pub fn table(&self, class: RangeClass) -> &PowerTable {
        match class {
            RangeClass::Compact => &self.compact,
            RangeClass::Medium => &self.medium,
            RangeClass::Full => &self.full,
        }
    }

    /// Look up a cached power in the table for `class`, moving to wider tables
    /// when it does not cover the requested window. Also returns the class of
    /// the table that served the lookup.
    ///
    /// # Panics
    ///
    /// Panics if even the Full table has no entry in the window, which cannot
    /// happen for binary64 inputs.
    pub fn cached_power(
        &self,
        class: RangeClass,
        min_e: i16,
        max_e: i16,
    ) -> (CachedPower, RangeClass) {
        let mut current = Some(class);
        while let Some(class) = current {
            if let Some(power) = self.table(class).lookup(min_e, max_e) {
                return (power, class);
            }
            current = class.wider();
        }
        panic!(
            "no cached power of ten with exponent in [{}, {}]",
            min_e, max_e
        );
    }
}
