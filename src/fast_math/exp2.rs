//! Bit-pattern exp2
//!
//! The inverse of the log2 trick: build the bit pattern of `2^x` directly.
//! The integer part of `x` goes into the exponent field, the fraction is either
//! dropped into the mantissa as-is (linear) or corrected with a polynomial /
//! rational fit of `2^f`.
//!
//! Error over `[-20, 20)`: linear ~3%, Taylor < 0.03%, rational < 0.006%,
//! rational-fast < 0.005%, signed-rational < 0.04% (< 0.004% for `x > 0`).
//! Results outside roughly `[-126, 127]` wrap the exponent field and are garbage.

#![allow(clippy::excessive_precision)]

use std::f32::consts::LN_2;

use crate::bits::{pow2_f32, trunc_i32, BitFloat, F32_EXP_BIAS, F32_MANT_BITS, F32_MANT_MASK};
use crate::branchless::select_f32;
use crate::domain::{check_domain, Domain};

// Mineiro's fastpow2 coefficients
pub(crate) const RATIONAL_OFFSET: f32 = 121.274_057_5;
pub(crate) const RATIONAL_NUM: f32 = 27.728_023_3;
pub(crate) const RATIONAL_DEN: f32 = 4.842_525_68;
pub(crate) const RATIONAL_SLOPE: f32 = 1.490_129_07;

/// Shift that pins the exponent of `x + FAST_SHIFT` for the fast rational tier.
pub(crate) const FAST_SHIFT: f32 = 383.0;
pub(crate) const FAST_OFFSET: f32 = 4.235_79;
pub(crate) const FAST_NUM: f32 = 27.728;
pub(crate) const FAST_DEN: f32 = 5.842_525_68;

/// Exponent range where the exponent field of `F` stays valid
/// (`[-126, 127]` for f32, `[-1022, 1023]` for f64).
#[inline(always)]
fn exp2_domain<F: BitFloat>() -> Domain {
    Domain::Range {
        lo: f64::from(1 - F::EXP_BIAS),
        hi: f64::from(F::EXP_BIAS),
    }
}

/// Linear tier: `bits(2^x) ≈ (x + bias - LOG_APPROX_CORRECT) · 2^m`.
#[inline(always)]
pub fn exp2_linear<F: BitFloat>(x: F) -> F {
    check_domain!(exp2_domain::<F>(), "exp2_linear", x);
    F::from_raw(F::float_to_raw((x + F::corrected_bias()) * F::BIT_TERM))
}

/// Quadratic fit `2^f ≈ f·(0.336·f + 0.659) + 1.0015` on the fraction.
///
/// The integer part is taken with a saturating *unsigned* truncation, so every
/// negative input lands in the `f < 0` branch of the polynomial and is wrong
/// (`exp2_quadratic(-2.5) ≈ 1.45`). Use it for `x ≥ 0` only.
#[inline(always)]
pub fn exp2_quadratic(x: f32) -> f32 {
    check_domain!(Domain::Range { lo: 0.0, hi: 127.0 }, "exp2_quadratic", x);
    let int_part = x as u32;
    let frac = x - int_part as f32;
    let poly = frac * (0.336 * frac + 0.659) + 1.0015;
    f32::from_bits(int_part.wrapping_add(F32_EXP_BIAS as u32) << F32_MANT_BITS) * poly
}

/// Taylor tier: exact `2^⌊x⌋` from the exponent field times a 5-term series for
/// `e^(f·ln2) - 1`. Exact for integer `x`.
#[inline(always)]
pub fn exp2_bits(x: f32) -> f32 {
    check_domain!(exp2_domain::<f32>(), "exp2_bits", x);
    let int_part = trunc_i32(x);
    let t = (x - int_part as f32) * LN_2;
    let series = t * (1.0 + t * (0.5 + t * (1.0 / 6.0 + t * (1.0 / 24.0 + t * (1.0 / 120.0)))));
    pow2_f32(int_part) * (series + 1.0)
}

/// Rational tier (Paul Mineiro's `fastpow2`).
///
/// `bits = 2^23 · (x + 121.2740575 + 27.7280233 / (4.84252568 - f) - 1.49012907·f)`
/// where `f` is the fraction shifted into `[0, 1)` for negative input.
#[inline(always)]
pub fn exp2_rational(x: f32) -> f32 {
    check_domain!(exp2_domain::<f32>(), "exp2_rational", x);
    let offset = select_f32(x < 0.0, 1.0, 0.0);
    let frac = (x - trunc_i32(x) as f32) + offset;
    let v = x + RATIONAL_OFFSET + RATIONAL_NUM / (RATIONAL_DEN - frac) - RATIONAL_SLOPE * frac;
    f32::from_raw(f32::float_to_raw(<f32 as BitFloat>::BIT_TERM * v))
}

/// Rational tier with the float-adder doing the split (Hobbelt's variant).
///
/// Adding 383 pins the exponent so the low mantissa bits *are* the fraction;
/// no float→int conversion is needed. Valid for roughly `x ∈ (-127, 129)`.
#[inline(always)]
pub fn exp2_rational_fast(x: f32) -> f32 {
    check_domain!(exp2_domain::<f32>(), "exp2_rational_fast", x);
    let r = x + FAST_SHIFT;
    let z = f32::from_bits(((F32_EXP_BIAS as u32) << F32_MANT_BITS) | ((r.to_bits() & 0x7FFF) << 8));
    let v = r - FAST_OFFSET + FAST_NUM / (FAST_DEN - z) - RATIONAL_SLOPE * z;
    f32::from_bits((v.to_bits() & F32_MANT_MASK) << 8)
}

/// Rational fit of `2^f - 1` with separate coefficient sets for positive and
/// non-positive input, picked with a bitmask select.
#[inline(always)]
pub fn exp2_rational_signed(x: f32) -> f32 {
    check_domain!(exp2_domain::<f32>(), "exp2_rational_signed", x);
    let int_part = trunc_i32(x);
    let frac = x - int_part as f32;
    let positive = x > 0.0;
    let a = select_f32(positive, 27.704_226_690_769_845_416, 27.525_417);
    let b = select_f32(positive, 4.841_670_224_413_411_517_1, 4.953_134);
    let c = select_f32(positive, 0.489_424_800_305_166_665_06, 0.434_024);
    let d = select_f32(positive, 5.722_039_132_051_609_383_6, 5.557_512);
    let r = a / (b - frac) - c * frac - d;
    pow2_f32(int_part) * (r + 1.0)
}
