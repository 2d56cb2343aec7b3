//! Refinement — one closed-form Newton/Heron step
//!
//! Each step roughly squares the relative error of a bit-hack estimate
//! (3-6% → 0.1-0.4%, → ~0.001% after a second step) for 2-4 extra flops.
//! Reciprocal and inverse-sqrt updates are multiplication-only; Heron's
//! square-root update needs one division.

use crate::bits::BitFloat;

/// Newton step for `1/x`: `y · (2 - x·y)`.
#[inline(always)]
pub fn newton_reciprocal<F: BitFloat>(x: F, y: F) -> F {
    y * (F::TWO - x * y)
}

/// Newton step for `1/√x`: `y · (1.5 - x/2 · y²)`.
#[inline(always)]
pub fn newton_inv_sqrt<F: BitFloat>(x: F, y: F) -> F {
    y * (F::THREE_HALVES - x * F::HALF * y * y)
}

/// Heron step for `√x`: `(y + x/y) / 2`.
#[inline(always)]
pub fn heron_sqrt<F: BitFloat>(x: F, y: F) -> F {
    F::HALF * (y + x / y)
}

/// Newton step for `x^(-1/n)`: `y · (1 + (1 - x·yⁿ)/n)`.
#[inline]
pub fn newton_inv_root(x: f32, y: f32, n: u8) -> f32 {
    let recip = 1.0 / n as f32;
    let mut y_pow_n = 1.0f32;
    for _ in 0..n {
        y_pow_n *= y;
    }
    y * (1.0 + recip * (1.0 - x * y_pow_n))
}

/// Newton-style correction of an `xⁿ` estimate `y`, using an inverse root of `y`
/// (`inv_root_y ≈ y^(-1/n) ≈ 1/x`): `y · (1 - n·(1 - x·inv_root_y))`.
#[inline(always)]
pub fn newton_pow_int(x: f32, y: f32, n: u8, inv_root_y: f32) -> f32 {
    y * (1.0 - n as f32 * (1.0 - x * inv_root_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_converge() {
        // Start 5% off and check the error shrinks roughly quadratically.
        let y = newton_reciprocal(4.0f32, 0.25 * 1.05);
        assert!((y - 0.25).abs() < 0.25 * 0.003, "rcp step {}", y);

        let y = newton_inv_sqrt(4.0f32, 0.5 * 1.05);
        assert!((y - 0.5).abs() < 0.5 * 0.005, "rsqrt step {}", y);

        let y = heron_sqrt(9.0f64, 3.0 * 1.05);
        assert!((y - 3.0).abs() < 3.0 * 0.002, "heron step {}", y);

        let y = newton_inv_root(8.0, 0.5 * 1.05, 3);
        assert!((y - 0.5).abs() < 0.5 * 0.01, "inv cube root step {}", y);
    }

    #[test]
    fn test_fixed_points() {
        assert_eq!(newton_reciprocal(2.0f32, 0.5), 0.5);
        assert_eq!(newton_inv_sqrt(4.0f32, 0.5), 0.5);
        assert_eq!(heron_sqrt(16.0f32, 4.0), 4.0);
        assert_eq!(newton_pow_int(2.0, 8.0, 3, 0.5), 8.0);
    }
}
