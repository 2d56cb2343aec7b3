//! Arithmetic in the log domain
//!
//! Adding two patterns adds the logs, i.e. multiplies. Each operand carries one
//! bias, so one bias has to come back off (`magic(0)`). Error is up to ~8.5%,
//! which makes `multiply`/`divide` mostly a demonstration of the idea.
//! [`scale_pow2`] touches only the exponent field and is exact.

use crate::bits::BitFloat;
use crate::domain::{check_domain, Domain};

/// `a · b ≈ bits(a) + bits(b) - magic(0)`.
#[inline(always)]
pub fn multiply<F: BitFloat>(a: F, b: F) -> F {
    check_domain!(Domain::Positive, "multiply", a);
    check_domain!(Domain::Positive, "multiply", b);
    F::from_raw(F::raw_sub(F::raw_add(a.to_raw(), b.to_raw()), F::power_magic(0.0)))
}

/// `a / b ≈ bits(a) - bits(b) + magic(0)`.
#[inline(always)]
pub fn divide<F: BitFloat>(a: F, b: F) -> F {
    check_domain!(Domain::Positive, "divide", a);
    check_domain!(Domain::Positive, "divide", b);
    F::from_raw(F::raw_add(F::raw_sub(a.to_raw(), b.to_raw()), F::power_magic(0.0)))
}

/// `x · 2^e` by adding `e` to the exponent field.
///
/// Exact while the result stays normal; overflow, underflow, zero and
/// subnormal input are not handled.
#[inline(always)]
pub fn scale_pow2<F: BitFloat>(x: F, e: i32) -> F {
    check_domain!(Domain::NonZero, "scale_pow2", x);
    F::from_raw(F::raw_add(x.to_raw(), F::raw_from_exponent(e)))
}
