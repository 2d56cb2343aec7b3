//! Branchless Operations — "CPUの迷いをなくす"
//!
//! A mispredicted branch flushes a 14-20 stage pipeline. The kernels that need a
//! sign-dependent constant (the rational exp2 fits) select it with a bitmask
//! instead, which is also exactly what the SIMD lanes do with a compare mask.

/// All-ones mask if `cond`, zero otherwise.
#[inline(always)]
pub fn mask_u32(cond: bool) -> u32 {
    (-(cond as i32)) as u32
}

/// Branchless select: if cond { a } else { b }
/// Works by computing both and masking.
#[inline(always)]
pub fn select_f32(cond: bool, a: f32, b: f32) -> f32 {
    let m = mask_u32(cond);
    f32::from_bits((a.to_bits() & m) | (b.to_bits() & !m))
}
