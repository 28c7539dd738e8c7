// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tier 1: MEMO data (immutable, precomputed).
//!
//! - [`bignum`]: fixed-width big integer used to build the tables and by the
//!   exact digit generator
//! - [`powers`]: the Compact, Medium and Full power-of-ten tables
//!
//! Tables are computed once per process and then only read.

pub mod bignum;
pub mod powers;

pub use bignum::Big;
pub use powers::{CachedPower, PowerTable, PowerTables};
