//! Natural log, natural exp and log-gamma
//!
//! Base-e versions of the linear tier: the same bit trick with `ln 2` and
//! `log2 e` folded into the scale factors.

use std::f32::consts::LN_2;

use crate::bits::BitFloat;
use crate::domain::{check_domain, Domain};

use super::log2::log2_rational;

/// `ln(x) ≈ bits · ln2 · 2^-23 - (127·ln2 - 0.03972)`.
///
/// Within 0.04 absolute, under 3% relative away from `x = 1`.
#[inline(always)]
pub fn ln(x: f32) -> f32 {
    check_domain!(Domain::Positive, "ln", x);
    const SCALE: f32 = LN_2 / (1u32 << 23) as f32;
    let offset = (std::f64::consts::LN_2 * 127.0 - 0.03972) as f32;
    f32::raw_to_float(x.to_bits()) * SCALE - offset
}

/// `e^x ≈ from_bits(x · log2(e) · 2^23 + 2^23 · (127 - C))`. Under 3% on `[-10, 10)`.
#[inline(always)]
pub fn exp(x: f32) -> f32 {
    check_domain!(Domain::Range { lo: -87.0, hi: 88.0 }, "exp", x);
    let scale = (std::f64::consts::LOG2_E * f64::from(1u32 << 23)) as f32;
    let offset = <f32 as BitFloat>::BIT_TERM * f32::corrected_bias();
    f32::from_raw(f32::float_to_raw(x * scale + offset))
}

/// Stirling's series with the rational log2:
/// `½ln(2π) + (x - ½)·ln(x - 0.2) - (x - 0.2) + 1/(300(x - 1))`.
///
/// Under 0.75% for `x ≥ 2.5`, about 0.2% from `x = 3`. Inaccurate below 2.5.
#[inline]
pub fn ln_gamma(x: f32) -> f32 {
    check_domain!(Domain::GreaterThan(1.0), "ln_gamma", x);
    let half_ln_two_pi = (0.5 * (2.0 * std::f64::consts::PI).ln()) as f32;
    let shifted = x - 0.2;
    half_ln_two_pi + (x - 0.5) * log2_rational(shifted) * LN_2 - shifted
        + (1.0 / 300.0) / (x - 1.0)
}
