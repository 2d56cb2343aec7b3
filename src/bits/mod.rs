//! Bit Patterns — IEEE-754 layout as plain integers
//!
//! "浮動小数点数は、すでに対数である"
//!
//! A positive float's bit pattern is `M + 2^m · E` (mantissa `M`, biased exponent `E`).
//! Read as an integer and scaled by `2^-m`, that is `E + M/2^m`, and because
//! `log2(1 + f) ≈ f` on `[0, 1)`, the raw pattern is already a piecewise-linear
//! approximation of `log2(x) + bias`. Every kernel in this crate starts from that fact.
//!
//! ## Format parameters
//! | format | mantissa bits | exponent bias | `BIT_TERM` |
//! |--------|---------------|---------------|------------|
//! | `f32`  | 23            | 127           | 2^23       |
//! | `f64`  | 52            | 1023          | 2^52       |
//!
//! ## Magic numbers
//! `x^p` in the log domain is `p · log2(x)`. Substituting the linear approximation gives
//! `bits(x^p) ≈ p · bits(x) + (1 - p) · 2^m · (bias - LOG_APPROX_CORRECT)`.
//! The second term is the "magic number" for power `p` ([`BitFloat::power_magic`]).
//!
//! All reinterpretation is done with `to_bits` / `from_bits` (or `bytemuck` for slices).

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Mean error of `log2(1 + f) ≈ f` over `[0, 1)`, fitted for the linear tier.
///
/// The exact integral `∫ log2(1+f) - f df` is 0.0573; 0.043 balances the
/// positive and negative error lobes better for the magic-number kernels.
pub const LOG_APPROX_CORRECT: f32 = 0.043;

/// `f32` mantissa width (explicit bits, hidden bit excluded).
pub const F32_MANT_BITS: u32 = f32::MANTISSA_DIGITS - 1;
/// `f32` exponent bias.
pub const F32_EXP_BIAS: i32 = f32::MAX_EXP - 1;
/// `2^23`: weight of one exponent step inside an `f32` bit pattern.
pub const F32_BIT_TERM: u32 = 1 << F32_MANT_BITS;
/// Mask selecting the `f32` mantissa field.
pub const F32_MANT_MASK: u32 = F32_BIT_TERM - 1;

/// `f64` mantissa width.
pub const F64_MANT_BITS: u32 = f64::MANTISSA_DIGITS - 1;
/// `f64` exponent bias.
pub const F64_EXP_BIAS: i32 = f64::MAX_EXP - 1;
/// `2^52`.
pub const F64_BIT_TERM: u64 = 1 << F64_MANT_BITS;
/// Mask selecting the `f64` mantissa field.
pub const F64_MANT_MASK: u64 = F64_BIT_TERM - 1;

/// A binary IEEE-754 format whose bit pattern can be used as a log-domain value.
///
/// Implemented for `f32` and `f64`. The generic kernels (`log2_linear`, `pow`,
/// `inv_sqrt`, ...) are written once against this trait; the polynomial and rational
/// tiers are `f32`-only because their coefficients were fitted for single precision.
pub trait BitFloat:
    Copy
    + PartialOrd
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Unsigned integer of the same width.
    type Bits: Copy + PartialEq + fmt::Debug + fmt::LowerHex;

    const MANT_BITS: u32;
    const EXP_BIAS: i32;
    /// `2^MANT_BITS` as a float.
    const BIT_TERM: Self;
    /// `2^-MANT_BITS` (exact).
    const BIT_TERM_RECIP: Self;
    const ONE: Self;
    const HALF: Self;
    const TWO: Self;
    const THREE_HALVES: Self;

    /// Bit cast to the raw pattern.
    fn to_raw(self) -> Self::Bits;

    /// Bit cast from a raw pattern.
    fn from_raw(bits: Self::Bits) -> Self;

    /// Numeric value of a raw pattern read as a *signed* integer.
    ///
    /// Identical to the unsigned reading for every non-negative float, and matches
    /// what a packed `cvtdq2ps` produces, so scalar and SIMD lanes agree bit for bit.
    fn raw_to_float(bits: Self::Bits) -> Self;

    /// Truncating numeric conversion of a float into a raw pattern (through the
    /// signed integer type, saturating).
    fn float_to_raw(value: Self) -> Self::Bits;

    /// Truncating conversion of an `f64` into a raw pattern. Used for magic numbers.
    fn raw_from_f64(value: f64) -> Self::Bits;

    /// Wrapping addition of two patterns.
    fn raw_add(a: Self::Bits, b: Self::Bits) -> Self::Bits;

    /// Wrapping subtraction of two patterns.
    fn raw_sub(a: Self::Bits, b: Self::Bits) -> Self::Bits;

    /// Logical shift right by one: halves the pattern, i.e. halves the log.
    fn raw_half(bits: Self::Bits) -> Self::Bits;

    /// `e << MANT_BITS`, wrapping: one exponent step per unit of `e`.
    fn raw_from_exponent(e: i32) -> Self::Bits;

    fn from_f64(value: f64) -> Self;

    fn to_f64(self) -> f64;

    /// `2^MANT_BITS` in double precision.
    #[inline(always)]
    fn bit_term_f64() -> f64 {
        (1u64 << Self::MANT_BITS) as f64
    }

    /// Magic number for `x^power`: `(1 - power) · 2^m · (bias - LOG_APPROX_CORRECT)`.
    ///
    /// Only meaningful for powers where the result is non-negative
    /// (`power ≤ 1`): sqrt (`0.5`), inverse sqrt (`-0.5`), reciprocal (`-1`),
    /// multiply/divide (`0`).
    #[inline(always)]
    fn power_magic(power: f64) -> Self::Bits {
        let bias = Self::EXP_BIAS as f64 - LOG_APPROX_CORRECT as f64;
        Self::raw_from_f64((1.0 - power) * Self::bit_term_f64() * bias)
    }

    /// `bias - LOG_APPROX_CORRECT` in this format.
    #[inline(always)]
    fn corrected_bias() -> Self {
        Self::from_f64(Self::EXP_BIAS as f64 - LOG_APPROX_CORRECT as f64)
    }
}

impl BitFloat for f32 {
    type Bits = u32;

    const MANT_BITS: u32 = F32_MANT_BITS;
    const EXP_BIAS: i32 = F32_EXP_BIAS;
    const BIT_TERM: Self = F32_BIT_TERM as f32;
    const BIT_TERM_RECIP: Self = 1.0 / F32_BIT_TERM as f32;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const TWO: Self = 2.0;
    const THREE_HALVES: Self = 1.5;

    #[inline(always)]
    fn to_raw(self) -> u32 {
        self.to_bits()
    }

    #[inline(always)]
    fn from_raw(bits: u32) -> Self {
        f32::from_bits(bits)
    }

    #[inline(always)]
    fn raw_to_float(bits: u32) -> Self {
        bits as i32 as f32
    }

    #[inline(always)]
    fn float_to_raw(value: Self) -> u32 {
        trunc_i32(value) as u32
    }

    #[inline(always)]
    fn raw_from_f64(value: f64) -> u32 {
        value as u32
    }

    #[inline(always)]
    fn raw_add(a: u32, b: u32) -> u32 {
        a.wrapping_add(b)
    }

    #[inline(always)]
    fn raw_sub(a: u32, b: u32) -> u32 {
        a.wrapping_sub(b)
    }

    #[inline(always)]
    fn raw_half(bits: u32) -> u32 {
        bits >> 1
    }

    #[inline(always)]
    fn raw_from_exponent(e: i32) -> u32 {
        (e as u32).wrapping_shl(F32_MANT_BITS)
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl BitFloat for f64 {
    type Bits = u64;

    const MANT_BITS: u32 = F64_MANT_BITS;
    const EXP_BIAS: i32 = F64_EXP_BIAS;
    const BIT_TERM: Self = F64_BIT_TERM as f64;
    const BIT_TERM_RECIP: Self = 1.0 / F64_BIT_TERM as f64;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const TWO: Self = 2.0;
    const THREE_HALVES: Self = 1.5;

    #[inline(always)]
    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    #[inline(always)]
    fn from_raw(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline(always)]
    fn raw_to_float(bits: u64) -> Self {
        bits as i64 as f64
    }

    #[inline(always)]
    fn float_to_raw(value: Self) -> u64 {
        value as i64 as u64
    }

    #[inline(always)]
    fn raw_from_f64(value: f64) -> u64 {
        value as u64
    }

    #[inline(always)]
    fn raw_add(a: u64, b: u64) -> u64 {
        a.wrapping_add(b)
    }

    #[inline(always)]
    fn raw_sub(a: u64, b: u64) -> u64 {
        a.wrapping_sub(b)
    }

    #[inline(always)]
    fn raw_half(bits: u64) -> u64 {
        bits >> 1
    }

    #[inline(always)]
    fn raw_from_exponent(e: i32) -> u64 {
        (e as i64 as u64).wrapping_shl(F64_MANT_BITS)
    }

    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Truncate toward zero the way `cvttps2dq` does: NaN and `|v| >= 2^31` give
/// `i32::MIN` instead of saturating.
#[inline(always)]
pub fn trunc_i32(v: f32) -> i32 {
    if v.abs() < 2_147_483_648.0 {
        v as i32
    } else {
        i32::MIN
    }
}

/// `2^e` built directly in the exponent field. Exact for `e` in `[-126, 127]`;
/// outside that range the exponent wraps into garbage.
#[inline(always)]
pub fn pow2_f32(e: i32) -> f32 {
    f32::from_bits((e.wrapping_add(F32_EXP_BIAS) as u32) << F32_MANT_BITS)
}

/// Zero-copy bit-pattern view of an `f32` slice.
#[inline]
pub fn bit_view(values: &[f32]) -> &[u32] {
    bytemuck::cast_slice(values)
}

/// Zero-copy bit-pattern view of an `f64` slice.
#[inline]
pub fn bit_view_f64(values: &[f64]) -> &[u64] {
    bytemuck::cast_slice(values)
}
