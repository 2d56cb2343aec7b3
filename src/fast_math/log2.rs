//! Bit-pattern log2
//!
//! | kernel | method | error (x ≤ 0.25 or x ≥ 4) | error on [1.25, 2) |
//! |---|---|---|---|
//! | [`log2_linear`] | raw pattern · 2^-m | < 2.1% | up to ~9% |
//! | [`log2_bits`] | exact exponent + quadratic mantissa | < 0.3% | < 1.8% |
//! | [`log2_quartic`] | exact exponent + quartic mantissa | < 0.08% | < 0.3% |
//! | [`log2_rational`] | raw pattern + rational mantissa fit | < 0.007% | < 0.021% |
//!
//! All tiers are ill-conditioned near `x = 1`, where `log2(x) → 0` and any absolute
//! error becomes a huge relative one. Non-positive input produces garbage.

#![allow(clippy::excessive_precision)]

use crate::bits::{BitFloat, F32_EXP_BIAS, F32_MANT_BITS, F32_MANT_MASK};
use crate::domain::{check_domain, Domain};

/// Quadratic mantissa fit `m · (QUAD_LINEAR - QUAD_SQUARE · m)`.
pub(crate) const QUAD_LINEAR: f32 = 1.356;
pub(crate) const QUAD_SQUARE: f32 = 0.3623;

// Mineiro's fastlog2 coefficients
pub(crate) const RATIONAL_OFFSET: f32 = 124.225_514_99;
pub(crate) const RATIONAL_SLOPE: f32 = 1.498_030_302;
pub(crate) const RATIONAL_NUM: f32 = 1.725_879_99;
pub(crate) const RATIONAL_DEN: f32 = 0.352_088_706_8;

/// Linear tier: the bit pattern itself, rescaled and de-biased.
///
/// `log2(x) ≈ bits · 2^-m + LOG_APPROX_CORRECT - bias`. One convert and one FMA-shaped
/// multiply-add. `log2_linear(1.0)` is `0.043`, not `0`.
#[inline(always)]
pub fn log2_linear<F: BitFloat>(x: F) -> F {
    check_domain!(Domain::Positive, "log2_linear", x);
    F::raw_to_float(x.to_raw()) * F::BIT_TERM_RECIP - F::corrected_bias()
}

/// Quadratic tier: exact integer part from the exponent field, quadratic fit
/// `m · (1.356 - 0.3623·m)` of `log2(1 + m)` for the mantissa `m ∈ [0, 1)`.
///
/// Exact at powers of two.
#[inline(always)]
pub fn log2_bits(x: f32) -> f32 {
    check_domain!(Domain::Positive, "log2_bits", x);
    let bits = x.to_bits();
    // Float's exponent equals ⌊log2(x)⌋
    let int_part = (bits >> F32_MANT_BITS) as i32 - F32_EXP_BIAS;
    // Force the exponent to zero so the value lands in [1, 2)
    let m = f32::from_bits((bits & F32_MANT_MASK) | ((F32_EXP_BIAS as u32) << F32_MANT_BITS)) - 1.0;
    int_part as f32 + m * (QUAD_LINEAR - QUAD_SQUARE * m)
}

/// Quartic tier: `m · (1.4088 - m · (0.49328 - 0.086·m²))` on the mantissa fraction.
///
/// More accurate than [`log2_bits`] away from 1, but the fit overshoots slightly at
/// `m → 1`, so it is *not* monotonic across binade boundaries.
#[inline(always)]
pub fn log2_quartic(x: f32) -> f32 {
    check_domain!(Domain::Positive, "log2_quartic", x);
    let bits = x.to_bits();
    let m = (bits & F32_MANT_MASK) as f32 * <f32 as BitFloat>::BIT_TERM_RECIP;
    let exp = (bits >> F32_MANT_BITS) as f32;
    m * (1.4088 - m * (0.49328 - 0.086 * m * m)) + exp - F32_EXP_BIAS as f32
}

/// Rational tier (Paul Mineiro's `fastlog2`).
///
/// Mantissa re-biased into `[0.5, 1)`, then
/// `bits·2^-23 - 124.22551499 - 1.498030302·m - 1.72587999 / (0.3520887068 + m)`.
/// Same cost order as the quadratic tier plus one division.
#[inline(always)]
pub fn log2_rational(x: f32) -> f32 {
    check_domain!(Domain::Positive, "log2_rational", x);
    let bits = x.to_bits();
    let m = f32::from_bits((bits & F32_MANT_MASK) | (((F32_EXP_BIAS - 1) as u32) << F32_MANT_BITS));
    f32::raw_to_float(bits) * <f32 as BitFloat>::BIT_TERM_RECIP
        - RATIONAL_OFFSET
        - RATIONAL_SLOPE * m
        - RATIONAL_NUM / (RATIONAL_DEN + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::percent_error;

    fn geometric(lo: f32, hi: f32, n: usize) -> impl Iterator<Item = f32> {
        let ratio = (hi / lo) as f64;
        (0..n).map(move |i| (lo as f64 * ratio.powf(i as f64 / (n - 1) as f64)) as f32)
    }

    fn max_abs_percent(kernel: fn(f32) -> f32, xs: impl Iterator<Item = f32>) -> (f32, f32) {
        let mut worst = (0.0f32, 0.0f32);
        for x in xs {
            let err = percent_error(x.log2(), kernel(x)).abs();
            if err > worst.0 {
                worst = (err, x);
            }
        }
        worst
    }

    fn far_from_one() -> impl Iterator<Item = f32> {
        geometric(1e-6, 1e6, 4000).filter(|&x| x <= 0.25 || x >= 4.0)
    }

    #[test]
    fn test_log2_bits_exact_at_powers_of_two() {
        assert_eq!(log2_bits(4.0), 2.0);
        assert_eq!(log2_bits(1.0), 0.0);
        assert_eq!(log2_bits(0.125), -3.0);
        assert_eq!(log2_bits(1024.0), 10.0);
    }

    #[test]
    fn test_linear_is_biased_at_one() {
        let y = log2_linear(1.0f32);
        assert!((y - 0.043).abs() < 1e-5, "log2_linear(1) = {}", y);
        let y = log2_linear(1.0f64);
        assert!((y - 0.043).abs() < 1e-6, "log2_linear(1f64) = {}", y);
    }

    #[test]
    fn test_linear_tier_bound() {
        let (err, at) = max_abs_percent(log2_linear::<f32>, far_from_one());
        assert!(err < 2.1, "log2_linear error {}% at {}", err, at);
    }

    #[test]
    fn test_bits_tier_bound() {
        let (err, at) = max_abs_percent(log2_bits, far_from_one());
        assert!(err < 0.3, "log2_bits error {}% at {}", err, at);
        let (err, at) = max_abs_percent(log2_bits, geometric(1.25, 1.999, 2000));
        assert!(err < 1.8, "log2_bits error {}% at {} near one", err, at);
    }

    #[test]
    fn test_quartic_tier_bound() {
        let (err, at) = max_abs_percent(log2_quartic, far_from_one());
        assert!(err < 0.08, "log2_quartic error {}% at {}", err, at);
        let (err, at) = max_abs_percent(log2_quartic, geometric(1.25, 1.999, 2000));
        assert!(err < 0.3, "log2_quartic error {}% at {} near one", err, at);
    }

    #[test]
    fn test_rational_tier_bound() {
        let (err, at) = max_abs_percent(log2_rational, far_from_one());
        assert!(err < 0.007, "log2_rational error {}% at {}", err, at);
        let (err, at) = max_abs_percent(log2_rational, geometric(1.25, 1.999, 2000));
        assert!(err < 0.021, "log2_rational error {}% at {} near one", err, at);
    }

    #[test]
    fn test_f64_linear_matches_f32_shape() {
        for &x in &[0.01f64, 0.5, 3.0, 1000.0] {
            let abs_err = (log2_linear(x) - x.log2()).abs();
            assert!(abs_err < 0.044, "f64 log2_linear({}) off by {}", x, abs_err);
        }
    }

    #[test]
    fn test_monotonic_tiers() {
        let xs: Vec<f32> = geometric(0.01, 100.0, 20_000).collect();
        for kernel in [log2_linear::<f32> as fn(f32) -> f32, log2_bits, log2_rational] {
            for w in xs.windows(2) {
                assert!(kernel(w[0]) <= kernel(w[1]), "not monotonic at {} -> {}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn test_quartic_is_not_monotonic() {
        // The quartic fit ends just above 1.0 at m → 1, so crossing into the next
        // binade steps *down* slightly.
        let below = f32::from_bits(2.0f32.to_bits() - 1);
        assert!(log2_quartic(below) > log2_quartic(2.0));
    }

    #[cfg(not(feature = "domain-checks"))]
    #[test]
    fn test_non_positive_input_is_garbage_not_a_panic() {
        let y = log2_bits(-4.0);
        assert!(y.is_finite());
        assert!((y - (-4.0f32).abs().log2()).abs() > 1.0, "log2_bits(-4) = {}", y);
        assert!(log2_rational(0.0) < -100.0);
    }
}
