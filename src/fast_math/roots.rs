//! Square roots and inverse roots
//!
//! Halving the raw pattern halves the log, so `√x` and `1/√x` are one shift and
//! one add/subtract of a magic number ([`BitFloat::power_magic`]). The inverse
//! square root with `p = -1/2` is the well-known `0x5F37…` trick.
//!
//! ## Accuracy on `[1e-3, 1e6]`
//! - `inv_sqrt_estimate`: < 3.6%, `inv_sqrt`: ~0.2%, `inv_sqrt_precise`: < 0.001%
//! - `sqrt_estimate`: < 4.4%, `sqrt`: ~0.1%

use crate::bits::BitFloat;
use crate::domain::{check_domain, Domain};

use super::refine::{heron_sqrt, newton_inv_root, newton_inv_sqrt};

/// `√x` from the pattern alone: `bits/2 + magic(1/2)`.
#[inline(always)]
pub fn sqrt_estimate<F: BitFloat>(x: F) -> F {
    check_domain!(Domain::NonNegative, "sqrt_estimate", x);
    F::from_raw(F::raw_add(F::raw_half(x.to_raw()), F::power_magic(0.5)))
}

/// [`sqrt_estimate`] plus one Heron step.
#[inline(always)]
pub fn sqrt<F: BitFloat>(x: F) -> F {
    heron_sqrt(x, sqrt_estimate(x))
}

/// `1/√x` from the pattern alone: `magic(-1/2) - bits/2`.
#[inline(always)]
pub fn inv_sqrt_estimate<F: BitFloat>(x: F) -> F {
    check_domain!(Domain::Positive, "inv_sqrt_estimate", x);
    F::from_raw(F::raw_sub(F::power_magic(-0.5), F::raw_half(x.to_raw())))
}

/// Fast inverse square root: estimate plus one Newton step.
#[inline(always)]
pub fn inv_sqrt<F: BitFloat>(x: F) -> F {
    newton_inv_sqrt(x, inv_sqrt_estimate(x))
}

/// Two Newton steps.
#[inline(always)]
pub fn inv_sqrt_precise<F: BitFloat>(x: F) -> F {
    newton_inv_sqrt(x, inv_sqrt(x))
}

/// `x^(-1/n)` for `n ≥ 1`: magic-number estimate `((n+1)·2^23·(bias - C) - bits) / n`
/// refined by one Newton step. Under 0.4% for `n ≤ 4`.
#[inline]
pub fn inv_root(x: f32, n: u8) -> f32 {
    check_domain!(Domain::Positive, "inv_root", x);
    check_domain!(Domain::GreaterThan(0.0), "inv_root", f32::from(n));
    let recip = 1.0 / f32::from(n);
    let scaled_bias = ((u32::from(n) + 1) << <f32 as BitFloat>::MANT_BITS) as f32 * f32::corrected_bias();
    let v = scaled_bias - f32::raw_to_float(x.to_bits());
    let y = f32::from_raw(f32::float_to_raw(recip * v));
    newton_inv_root(x, y, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::percent_error;

    fn geometric(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f32> {
        (0..n).map(move |i| (lo * (hi / lo).powf(i as f64 / (n - 1) as f64)) as f32)
    }

    fn worst(exact: impl Fn(f64) -> f64, approx: impl Fn(f32) -> f32) -> (f32, f32) {
        let mut out = (0.0f32, 0.0f32);
        for x in geometric(1e-3, 1e6, 5000) {
            let err = percent_error(exact(x as f64) as f32, approx(x)).abs();
            if err > out.0 {
                out = (err, x);
            }
        }
        out
    }

    #[test]
    fn test_inv_sqrt_at_four() {
        let est = inv_sqrt_estimate(4.0f32);
        assert!(percent_error(0.5, est).abs() < 3.5, "estimate {}", est);
        let one = inv_sqrt(4.0f32);
        assert!(percent_error(0.5, one).abs() < 0.2, "one step {}", one);
        let two = inv_sqrt_precise(4.0f32);
        assert!(percent_error(0.5, two).abs() < 0.01, "two steps {}", two);
    }

    #[test]
    fn test_inv_sqrt_bounds() {
        let exact = |x: f64| 1.0 / x.sqrt();
        let (err, at) = worst(exact, inv_sqrt_estimate::<f32>);
        assert!(err < 3.6, "inv_sqrt_estimate error {}% at {}", err, at);
        let (err, at) = worst(exact, inv_sqrt::<f32>);
        assert!(err < 0.21, "inv_sqrt error {}% at {}", err, at);
        let (err, at) = worst(exact, inv_sqrt_precise::<f32>);
        assert!(err < 0.001, "inv_sqrt_precise error {}% at {}", err, at);
    }

    #[test]
    fn test_sqrt_bounds() {
        let (err, at) = worst(f64::sqrt, sqrt_estimate::<f32>);
        assert!(err < 4.4, "sqrt_estimate error {}% at {}", err, at);
        let (err, at) = worst(f64::sqrt, sqrt::<f32>);
        assert!(err < 0.11, "sqrt error {}% at {}", err, at);
    }

    #[test]
    fn test_f64_roots() {
        for &x in &[1e-3f64, 0.3, 4.0, 12345.0] {
            let e = percent_error(1.0 / x.sqrt(), inv_sqrt(x)).abs();
            assert!(e < 0.21, "f64 inv_sqrt({}) error {}%", x, e);
            let e = percent_error(x.sqrt(), sqrt(x)).abs();
            assert!(e < 0.11, "f64 sqrt({}) error {}%", x, e);
        }
    }

    #[test]
    fn test_inv_root() {
        for n in 1..=4u8 {
            for x in geometric(0.01, 1000.0, 3000) {
                let exact = (x as f64).powf(-1.0 / n as f64) as f32;
                let err = percent_error(exact, inv_root(x, n)).abs();
                assert!(err < 0.4, "inv_root({}, {}) error {}%", x, n, err);
            }
        }
        let y = inv_root(4.0, 2);
        assert!((y - 0.5).abs() < 0.001, "inv_root(4, 2) = {}", y);
    }
}
