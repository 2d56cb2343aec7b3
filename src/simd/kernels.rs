//! 4-wide kernels
//!
//! Lane `i` of every `*_x4` kernel is bit-for-bit the scalar kernel applied to
//! lane `i`, for in-domain input. Each one repeats the scalar operation order
//! exactly (no FMA contraction, no re-association) and shares its coefficients
//! with the scalar module.

use std::f32::consts::LN_2;

use crate::bits::{BitFloat, F32_EXP_BIAS, F32_MANT_MASK};
use crate::fast_math::{exp2, log2};

use super::{F32x4, U32x4};

const MANT_MASK: U32x4 = U32x4::splat(F32_MANT_MASK);
const EXP_BIAS: U32x4 = U32x4::splat(F32_EXP_BIAS as u32);
/// Exponent field of 1.0, i.e. `127 << 23`.
const EXP_ONE: U32x4 = U32x4::splat(0x3F80_0000);
/// Exponent field of 0.5, i.e. `126 << 23`.
const EXP_HALF: U32x4 = U32x4::splat(0x3F00_0000);
const BIT_TERM: F32x4 = F32x4::splat(<f32 as BitFloat>::BIT_TERM);
const BIT_TERM_RECIP: F32x4 = F32x4::splat(<f32 as BitFloat>::BIT_TERM_RECIP);
const ONE: F32x4 = F32x4::splat(1.0);

#[inline(always)]
fn corrected_bias() -> F32x4 {
    F32x4::splat(f32::corrected_bias())
}

/// `2^e` per lane from integer lanes, like `bits::pow2_f32`.
#[inline(always)]
fn pow2(int_part: U32x4) -> F32x4 {
    F32x4::from_bits(int_part.add(EXP_BIAS).shl::<23>())
}

// ── log2 ──

#[inline]
#[must_use]
pub fn log2_linear_x4(x: F32x4) -> F32x4 {
    x.to_bits().convert_i32_to_f32().mul(BIT_TERM_RECIP).sub(corrected_bias())
}

#[inline]
#[must_use]
pub fn log2_bits_x4(x: F32x4) -> F32x4 {
    let bits = x.to_bits();
    let int_part = bits.shr::<23>().sub(EXP_BIAS).convert_i32_to_f32();
    let m = F32x4::from_bits(bits.and(MANT_MASK).or(EXP_ONE)).sub(ONE);
    let fit = F32x4::splat(log2::QUAD_LINEAR).sub(F32x4::splat(log2::QUAD_SQUARE).mul(m));
    int_part.add(m.mul(fit))
}

#[inline]
#[must_use]
pub fn log2_rational_x4(x: F32x4) -> F32x4 {
    let bits = x.to_bits();
    let m = F32x4::from_bits(bits.and(MANT_MASK).or(EXP_HALF));
    let tail = F32x4::splat(log2::RATIONAL_NUM).div(F32x4::splat(log2::RATIONAL_DEN).add(m));
    bits.convert_i32_to_f32()
        .mul(BIT_TERM_RECIP)
        .sub(F32x4::splat(log2::RATIONAL_OFFSET))
        .sub(F32x4::splat(log2::RATIONAL_SLOPE).mul(m))
        .sub(tail)
}

// ── exp2 ──

#[inline]
#[must_use]
pub fn exp2_linear_x4(x: F32x4) -> F32x4 {
    F32x4::from_bits(x.add(corrected_bias()).mul(BIT_TERM).trunc_i32())
}

#[inline]
#[must_use]
pub fn exp2_bits_x4(x: F32x4) -> F32x4 {
    let int_part = x.trunc_i32();
    let t = x.sub(int_part.convert_i32_to_f32()).mul(F32x4::splat(LN_2));
    let mut series = t.mul(F32x4::splat(1.0 / 120.0));
    series = t.mul(F32x4::splat(1.0 / 24.0).add(series));
    series = t.mul(F32x4::splat(1.0 / 6.0).add(series));
    series = t.mul(F32x4::splat(0.5).add(series));
    series = t.mul(ONE.add(series));
    pow2(int_part).mul(series.add(ONE))
}

#[inline]
#[must_use]
pub fn exp2_rational_x4(x: F32x4) -> F32x4 {
    let offset = x.cmp_lt(F32x4::zero()).select(ONE, F32x4::zero());
    let frac = x.sub(x.trunc_i32().convert_i32_to_f32()).add(offset);
    let v = x
        .add(F32x4::splat(exp2::RATIONAL_OFFSET))
        .add(F32x4::splat(exp2::RATIONAL_NUM).div(F32x4::splat(exp2::RATIONAL_DEN).sub(frac)))
        .sub(F32x4::splat(exp2::RATIONAL_SLOPE).mul(frac));
    F32x4::from_bits(BIT_TERM.mul(v).trunc_i32())
}

#[inline]
#[must_use]
pub fn exp2_rational_fast_x4(x: F32x4) -> F32x4 {
    let r = x.add(F32x4::splat(exp2::FAST_SHIFT));
    let z = F32x4::from_bits(EXP_ONE.or(r.to_bits().and(U32x4::splat(0x7FFF)).shl::<8>()));
    let v = r
        .sub(F32x4::splat(exp2::FAST_OFFSET))
        .add(F32x4::splat(exp2::FAST_NUM).div(F32x4::splat(exp2::FAST_DEN).sub(z)))
        .sub(F32x4::splat(exp2::RATIONAL_SLOPE).mul(z));
    F32x4::from_bits(v.to_bits().and(MANT_MASK).shl::<8>())
}

// ── pow ──

/// Linear-tier `x^y` with one exponent for all lanes.
#[inline]
#[must_use]
pub fn pow_x4(x: F32x4, y: f32) -> F32x4 {
    let offset = F32x4::splat(<f32 as BitFloat>::BIT_TERM * f32::corrected_bias());
    let yv = F32x4::splat(y);
    let scaled = yv.mul(x.to_bits().convert_i32_to_f32());
    F32x4::from_bits(scaled.sub(yv.sub(ONE).mul(offset)).trunc_i32())
}

// ── roots ──

#[inline]
#[must_use]
pub fn sqrt_estimate_x4(x: F32x4) -> F32x4 {
    F32x4::from_bits(x.to_bits().shr::<1>().add(U32x4::splat(f32::power_magic(0.5))))
}

#[inline]
#[must_use]
pub fn sqrt_x4(x: F32x4) -> F32x4 {
    let y = sqrt_estimate_x4(x);
    F32x4::splat(0.5).mul(y.add(x.div(y)))
}

#[inline]
#[must_use]
pub fn inv_sqrt_estimate_x4(x: F32x4) -> F32x4 {
    F32x4::from_bits(U32x4::splat(f32::power_magic(-0.5)).sub(x.to_bits().shr::<1>()))
}

#[inline]
#[must_use]
pub fn inv_sqrt_x4(x: F32x4) -> F32x4 {
    let y = inv_sqrt_estimate_x4(x);
    let half_x_y2 = x.mul(F32x4::splat(0.5)).mul(y).mul(y);
    y.mul(F32x4::splat(1.5).sub(half_x_y2))
}

// ── reciprocal ──

#[inline]
#[must_use]
pub fn reciprocal_estimate_x4(x: F32x4) -> F32x4 {
    F32x4::from_bits(U32x4::splat(f32::power_magic(-1.0)).sub(x.to_bits()))
}

#[inline]
#[must_use]
pub fn reciprocal_x4(x: F32x4) -> F32x4 {
    let y = reciprocal_estimate_x4(x);
    y.mul(F32x4::splat(2.0).sub(x.mul(y)))
}
