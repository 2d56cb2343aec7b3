//! Input Domains — what each kernel expects, and an opt-in debug assertion layer
//!
//! Kernels never validate: out-of-domain input is a silent accuracy defect, not a
//! fault. Building with `debug_assertions` *and* the `domain-checks` feature turns
//! every documented domain into a panic with a [`DomainError`] message, which is
//! handy while wiring a pipeline. Release builds are unaffected.

use std::fmt;

/// Input domain of a kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Finite and `> 0`.
    Positive,
    /// Finite and `>= 0`.
    NonNegative,
    /// Any finite value.
    Finite,
    /// Finite and `!= 0`.
    NonZero,
    /// Finite and strictly greater than the bound.
    GreaterThan(f64),
    /// Finite and within `[lo, hi]`.
    Range { lo: f64, hi: f64 },
}

impl Domain {
    /// True if `x` lies inside the domain.
    #[inline]
    pub fn contains(self, x: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        match self {
            Domain::Positive => x > 0.0,
            Domain::NonNegative => x >= 0.0,
            Domain::Finite => true,
            Domain::NonZero => x != 0.0,
            Domain::GreaterThan(bound) => x > bound,
            Domain::Range { lo, hi } => x >= lo && x <= hi,
        }
    }

    /// Validate `x` for `kernel`, returning it unchanged on success.
    pub fn validate(self, kernel: &'static str, x: f64) -> Result<f64, DomainError> {
        if self.contains(x) {
            Ok(x)
        } else {
            Err(DomainError {
                kernel,
                input: x,
                domain: self,
            })
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Positive => write!(f, "x > 0"),
            Domain::NonNegative => write!(f, "x >= 0"),
            Domain::Finite => write!(f, "finite x"),
            Domain::NonZero => write!(f, "x != 0"),
            Domain::GreaterThan(bound) => write!(f, "x > {}", bound),
            Domain::Range { lo, hi } => write!(f, "{} <= x <= {}", lo, hi),
        }
    }
}

/// Input outside a kernel's documented domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainError {
    pub kernel: &'static str,
    pub input: f64,
    pub domain: Domain,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] input {} outside domain ({})",
            self.kernel, self.input, self.domain
        )
    }
}

impl std::error::Error for DomainError {}

/// True when the debug assertion layer is compiled in.
pub const CHECKS_ENABLED: bool = cfg!(all(debug_assertions, feature = "domain-checks"));

/// Assert a kernel input against its domain (debug + `domain-checks` only).
macro_rules! check_domain {
    ($domain:expr, $kernel:literal, $x:expr) => {
        if $crate::domain::CHECKS_ENABLED {
            let value = $crate::bits::BitFloat::to_f64($x);
            if let Err(err) = $domain.validate($kernel, value) {
                panic!("{}", err);
            }
        }
    };
}

pub(crate) use check_domain;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        assert!(Domain::Positive.contains(1e-30));
        assert!(!Domain::Positive.contains(0.0));
        assert!(!Domain::Positive.contains(f64::INFINITY));
        assert!(Domain::NonNegative.contains(0.0));
        assert!(!Domain::Finite.contains(f64::NAN));
        assert!(!Domain::NonZero.contains(0.0));
        assert!(Domain::GreaterThan(1.0).contains(1.5));
        assert!(!Domain::GreaterThan(1.0).contains(1.0));
        let r = Domain::Range { lo: -126.0, hi: 127.0 };
        assert!(r.contains(-126.0) && r.contains(127.0));
        assert!(!r.contains(127.5));
    }

    #[test]
    fn test_validate_error_message() {
        let err = Domain::Positive.validate("log2_bits", -1.0).unwrap_err();
        assert_eq!(err.kernel, "log2_bits");
        assert_eq!(err.to_string(), "[log2_bits] input -1 outside domain (x > 0)");
        assert_eq!(Domain::Finite.validate("exp2_bits", 3.0), Ok(3.0));
    }

    #[cfg(all(debug_assertions, feature = "domain-checks"))]
    #[test]
    #[should_panic(expected = "outside domain")]
    fn test_check_domain_panics_when_enabled() {
        check_domain!(Domain::Positive, "test_kernel", -1.0f32);
    }

    #[test]
    fn test_check_domain_accepts_valid_input() {
        check_domain!(Domain::Positive, "test_kernel", 2.0f32);
        check_domain!(Domain::Finite, "test_kernel", -2.0f64);
    }
}
