//! Accuracy Metrics — percent error and range sweeps
//!
//! `percent_error` is the single measure used for every bound in this crate.
//! Note the denominator: the *larger* of the exact and estimated value, not
//! `|exact|`. Positive errors (over-estimates) are therefore slightly damped
//! compared to the textbook relative error.

use crate::bits::BitFloat;

/// Default subdivision of the coarse step for the refinement pass.
pub const DEFAULT_REFINE: u32 = 100;

/// `100 · (estimate - exact) / max(exact, estimate)`.
#[inline]
pub fn percent_error<F: BitFloat>(exact: F, estimate: F) -> F {
    let denom = if exact > estimate { exact } else { estimate };
    F::from_f64(100.0) * (estimate - exact) / denom
}

/// Result of a [`Sweep`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    /// Signed percent error with the largest magnitude.
    pub max_error: f64,
    /// Input where `max_error` occurred.
    pub max_error_at: f64,
    /// Mean of `|percent_error|` over the coarse pass.
    pub mean_abs_error: f64,
    /// Number of finite samples evaluated (both passes).
    pub samples: usize,
    /// Samples where the exact or estimated value was not finite; skipped.
    pub non_finite: usize,
}

impl ErrorStats {
    fn empty() -> Self {
        Self {
            max_error: 0.0,
            max_error_at: f64::NAN,
            mean_abs_error: 0.0,
            samples: 0,
            non_finite: 0,
        }
    }

    fn record(&mut self, x: f64, err: f64) {
        self.samples += 1;
        if err.abs() > self.max_error.abs() || self.max_error_at.is_nan() {
            self.max_error = err;
            self.max_error_at = x;
        }
    }
}

/// Worst-case error search over `[lo, hi)`.
///
/// A coarse pass samples `lo + i·step`; a second pass re-samples the interval
/// `[worst - step, worst + step]` at `step / refine` to pin the maximum down.
///
/// ```
/// use alice_bitmath::fast_math::log2_rational;
/// use alice_bitmath::metrics::Sweep;
///
/// let stats = Sweep::new(4.0, 1000.0)
///     .with_step(0.5)
///     .run(|x| x.log2(), |x| log2_rational(x as f32) as f64);
/// assert!(stats.max_error.abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    lo: f64,
    hi: f64,
    step: f64,
    refine: u32,
}

impl Sweep {
    /// Sweep `[lo, hi)` with 1000 coarse steps.
    #[must_use]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            step: (hi - lo) / 1000.0,
            refine: DEFAULT_REFINE,
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Refinement factor; `0` or `1` disables the second pass.
    #[must_use]
    pub fn with_refine(mut self, refine: u32) -> Self {
        self.refine = refine;
        self
    }

    /// Measure `approx` against `exact`. Pure: nothing is printed.
    pub fn run(&self, exact: impl Fn(f64) -> f64, approx: impl Fn(f64) -> f64) -> ErrorStats {
        let mut stats = ErrorStats::empty();
        let valid = self.step > 0.0 && self.hi > self.lo;
        if !valid {
            log::warn!(
                "degenerate sweep [{}, {}) step {}: nothing sampled",
                self.lo,
                self.hi,
                self.step
            );
            return stats;
        }

        let mut abs_sum = 0.0;
        let mut coarse = 0usize;
        let mut i = 0u64;
        loop {
            let x = self.lo + i as f64 * self.step;
            if x >= self.hi {
                break;
            }
            i += 1;
            match sample(x, &exact, &approx) {
                Some(err) => {
                    abs_sum += err.abs();
                    coarse += 1;
                    stats.record(x, err);
                }
                None => stats.non_finite += 1,
            }
        }
        if coarse > 0 {
            stats.mean_abs_error = abs_sum / coarse as f64;
        }

        if self.refine > 1 && !stats.max_error_at.is_nan() {
            let fine = self.step / f64::from(self.refine);
            let start = (stats.max_error_at - self.step).max(self.lo);
            let end = (stats.max_error_at + self.step).min(self.hi);
            let mut j = 0u64;
            loop {
                let x = start + j as f64 * fine;
                if x >= end {
                    break;
                }
                j += 1;
                match sample(x, &exact, &approx) {
                    Some(err) => stats.record(x, err),
                    None => stats.non_finite += 1,
                }
            }
        }
        log::trace!(
            "sweep [{}, {}): max {}% at {} over {} samples",
            self.lo,
            self.hi,
            stats.max_error,
            stats.max_error_at,
            stats.samples
        );
        stats
    }
}

fn sample(x: f64, exact: &impl Fn(f64) -> f64, approx: &impl Fn(f64) -> f64) -> Option<f64> {
    let e = exact(x);
    let a = approx(x);
    if !e.is_finite() || !a.is_finite() {
        return None;
    }
    let err = percent_error(e, a);
    err.is_finite().then_some(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_math::{exp2_rational, inv_sqrt};

    #[test]
    fn test_percent_error_asymmetric_denominator() {
        assert_eq!(percent_error(100.0f32, 110.0), 100.0 * 10.0 / 110.0);
        assert_eq!(percent_error(100.0f32, 90.0), -10.0);
        assert_eq!(percent_error(2.0f64, 2.0), 0.0);
    }

    #[test]
    fn test_sweep_finds_known_maximum() {
        // |x - 0.5| peaks at the ends; refinement should land on the edge.
        let stats = Sweep::new(0.0, 1.0)
            .with_step(0.1)
            .run(|x| x + 10.0, |x| x + 10.0 + (x - 0.5).abs());
        assert!(stats.max_error > 0.0);
        assert!(stats.max_error_at < 0.01, "max at {}", stats.max_error_at);
        assert_eq!(stats.non_finite, 0);
        assert!(stats.samples > 10);
    }

    #[test]
    fn test_sweep_on_kernels() {
        let stats = Sweep::new(-20.0, 20.0)
            .with_step(0.05)
            .run(f64::exp2, |x| exp2_rational(x as f32) as f64);
        assert!(stats.max_error.abs() < 0.0065, "exp2_rational {:?}", stats);
        let stats = Sweep::new(0.001, 100.0)
            .with_step(0.01)
            .with_refine(1)
            .run(|x| 1.0 / x.sqrt(), |x| inv_sqrt(x as f32) as f64);
        assert!(stats.max_error.abs() < 0.21, "inv_sqrt {:?}", stats);
        assert!(stats.mean_abs_error < stats.max_error.abs());
    }

    #[test]
    fn test_degenerate_sweeps_are_empty() {
        let stats = Sweep::new(1.0, 1.0).run(|x| x, |x| x);
        assert_eq!(stats.samples, 0);
        let stats = Sweep::new(0.0, 1.0).with_step(0.0).run(|x| x, |x| x);
        assert_eq!(stats.samples, 0);
        let stats = Sweep::new(0.0, 1.0).with_step(-0.1).run(|x| x, |x| x);
        assert_eq!(stats.samples, 0);
    }

    #[test]
    fn test_non_finite_samples_are_counted() {
        let stats = Sweep::new(-1.0, 1.0)
            .with_step(0.5)
            .with_refine(1)
            .run(|x| x.ln(), |x| x.ln());
        // ln of -1, -0.5 is NaN, ln 0 is -inf; 0.5 is finite
        assert_eq!(stats.non_finite, 3);
        assert_eq!(stats.samples, 1);
    }
}
