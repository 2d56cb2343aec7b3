//! Fast Math — Bit-Pattern Approximations
//!
//! "重い命令を整数演算に置き換える"
//!
//! Every kernel reinterprets the IEEE-754 pattern of its input as an integer,
//! applies a linear / polynomial / rational correction, and optionally refines
//! the estimate with one Newton or Heron step.
//!
//! ## Tiers
//! - **Linear**: the raw pattern alone (`log2_linear`, `exp2_linear`, `pow`,
//!   `*_estimate`). A handful of integer ops; 2-6% error.
//! - **Polynomial**: exact exponent field, polynomial in the mantissa
//!   (`log2_bits`, `log2_quartic`, `exp2_quadratic`, `exp2_bits`). 0.03-0.3%.
//! - **Rational**: Mineiro-style rational fits (`log2_rational`, `exp2_rational*`).
//!   Below 0.01% away from the ill-conditioned points.
//! - **Refined**: estimate + Newton (`inv_sqrt`, `reciprocal`, `sqrt`, ...).
//!
//! ## Contract
//! Kernels are pure `fn`s, never allocate, never fail and never validate in release
//! builds. Out-of-domain input (non-positive log argument, exponent outside the
//! representable range) returns garbage. See [`crate::domain`] for the opt-in
//! debug assertions.

pub mod arithmetic;
pub mod exp2;
pub mod log2;
pub mod natural;
pub mod pow;
pub mod reciprocal;
pub mod refine;
pub mod roots;

pub use arithmetic::{divide, multiply, scale_pow2};
pub use exp2::{
    exp2_bits, exp2_linear, exp2_quadratic, exp2_rational, exp2_rational_fast,
    exp2_rational_signed,
};
pub use log2::{log2_bits, log2_linear, log2_quartic, log2_rational};
pub use natural::{exp, ln, ln_gamma};
pub use pow::{
    pow, pow_bits, pow_int, pow_log2_linear, pow_via_log2, pow_via_log2_bits,
    pow_via_log2_fast,
};
pub use reciprocal::{reciprocal, reciprocal_estimate, reciprocal_precise};
pub use roots::{inv_root, inv_sqrt, inv_sqrt_estimate, inv_sqrt_precise, sqrt, sqrt_estimate};
