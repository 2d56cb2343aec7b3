//! Power functions
//!
//! `x^y = 2^(y · log2 x)`. The cheapest form never leaves the integer domain:
//! scale the raw pattern by `y` and re-add the bias ([`pow`]). The composed forms
//! run an accurate log2 through one of the exp2 tiers.
//!
//! | kernel | `y = 1.45` on `[0.01, 1000]` |
//! |---|---|
//! | [`pow`] | ~7% (exact-ish at `y = 1`, -2.15% at `y = 0`) |
//! | [`pow_log2_linear`] | < 3% |
//! | [`pow_via_log2_bits`] | < 0.05% |
//! | [`pow_via_log2`] / [`pow_via_log2_fast`] | < 0.03% |

use crate::bits::{BitFloat, F32_MANT_BITS, F32_MANT_MASK};
use crate::domain::{check_domain, Domain};

use super::exp2::{exp2_bits, exp2_linear, exp2_rational, exp2_rational_fast};
use super::log2::log2_rational;
use super::refine::newton_pow_int;
use super::roots::inv_root;

/// Linear-tier power: `bits(x^y) ≈ y · bits(x) - (y - 1) · 2^m · (bias - LOG_APPROX_CORRECT)`.
#[inline(always)]
pub fn pow<F: BitFloat>(x: F, y: F) -> F {
    check_domain!(Domain::Positive, "pow", x);
    let offset = F::BIT_TERM * F::corrected_bias();
    F::from_raw(F::float_to_raw(y * F::raw_to_float(x.to_raw()) - (y - F::ONE) * offset))
}

/// Power with a quadratic mantissa log folded into the pattern.
///
/// The mantissa field is replaced by `M · (1.356 - 0.3623·M/2^23)` before scaling, so
/// the linear-log error no longer grows with `y`. Around 4.6% at `y = 4` where
/// [`pow`] is near 14%.
#[inline(always)]
pub fn pow_bits(x: f32, y: f32) -> f32 {
    check_domain!(Domain::Positive, "pow_bits", x);
    let bits = x.to_bits();
    let mant = (bits & F32_MANT_MASK) as f32;
    let exp = (bits & (u32::MAX << F32_MANT_BITS)) as f32;
    let log_mant = mant * (1.356 - (0.3623 / <f32 as BitFloat>::BIT_TERM) * mant);
    // 0x3F80_0000: the pattern of 1.0
    let log_bits = log_mant + exp - 1_065_353_216.0;
    let offset = <f32 as BitFloat>::BIT_TERM * f32::corrected_bias();
    f32::from_raw(f32::float_to_raw(y * log_bits + offset))
}

/// `exp2_rational(y · log2_rational(x))`. The accurate general-purpose power.
#[inline(always)]
pub fn pow_via_log2(x: f32, y: f32) -> f32 {
    exp2_rational(y * log2_rational(x))
}

/// [`pow_via_log2`] with [`exp2_rational_fast`].
///
/// Slightly faster, but a negative base sends `log2_rational` to about -255 and the
/// exponent far outside the 383-offset window, so the result explodes instead of
/// merely being wrong.
#[inline(always)]
pub fn pow_via_log2_fast(x: f32, y: f32) -> f32 {
    exp2_rational_fast(y * log2_rational(x))
}

/// [`pow_via_log2`] with the Taylor exp2.
#[inline(always)]
pub fn pow_via_log2_bits(x: f32, y: f32) -> f32 {
    exp2_bits(y * log2_rational(x))
}

/// Accurate log2, linear exp2. Any log2 around 0.1% works here; the exp2 side
/// dominates the error.
#[inline(always)]
pub fn pow_log2_linear(x: f32, y: f32) -> f32 {
    exp2_linear(y * log2_rational(x))
}

/// Integer power `x^n` (`n ≥ 1`): [`pow`] estimate, corrected by one Newton step
/// that uses [`inv_root`] of the estimate.
#[inline]
pub fn pow_int(x: f32, n: u8) -> f32 {
    check_domain!(Domain::Positive, "pow_int", x);
    check_domain!(Domain::GreaterThan(0.0), "pow_int", f32::from(n));
    let y = pow(x, f32::from(n));
    newton_pow_int(x, y, n, inv_root(y, n))
}
