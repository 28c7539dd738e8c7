// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use adaptive_dragonbox::AdaptiveEngine;

/// Install a test-writer subscriber honoring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assert that `rendered` parses back to exactly `value`.
pub fn assert_round_trip(value: f64, rendered: &str) {
    let parsed: f64 = rendered
        .parse()
        .unwrap_or_else(|e| panic!("{rendered:?} does not parse: {e}"));
    assert_eq!(
        parsed.to_bits(),
        value.to_bits(),
        "{rendered} does not round-trip to {value:e}"
    );
}

/// Significant digits in the standard library's shortest rendering.
pub fn std_digit_count(value: f64) -> usize {
    let scientific = format!("{:e}", value.abs());
    let mantissa = scientific.split('e').next().unwrap_or_default();
    mantissa.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Significant digits in one of our plain-notation renderings.
pub fn digit_count(rendered: &str) -> usize {
    let digits: String = rendered.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len().max(1)
}

/// Inputs that stress every route through the converter.
pub fn sample_values() -> Vec<f64> {
    let mut values = vec![
        0.0,
        -0.0,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        1.0,
        -42.0,
        1e15,
        1e21,
        0.5,
        0.1,
        0.001,
        3.25,
        0.3,
        1.0 / 3.0,
        std::f64::consts::PI,
        1e-7,
        1e200,
        -2.5e-300,
        f64::MAX,
        f64::MIN_POSITIVE,
        5e-324,
    ];
    // deterministic spread over the whole exponent range
    let mut state = 0x2545_f491_4f6c_dd1du64;
    for _ in 0..200 {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let value = f64::from_bits(state >> 1);
        if value.is_finite() {
            values.push(value);
        }
    }
    values
}

/// Engine whose parallel path engages on small inputs.
pub fn parallel_engine() -> AdaptiveEngine {
    AdaptiveEngine::builder()
        .workers(4)
        .chunk_size(16)
        .parallel_threshold(32)
        .build()
        .expect("valid configuration")
}
