// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! IEEE-754 binary64 decomposition.
//!
//! - [`constants`]: layout of the 64-bit word
//! - [`bits`]: sign / exponent / fraction fields and special-value detection
//! - [`boundary`]: the interval of decimals that round back to a value

pub mod bits;
pub mod boundary;
pub mod constants;

pub use bits::{FloatBits, FloatClass};
pub use boundary::Boundaries;
