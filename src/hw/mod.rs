//! Hardware Tier — the approximations the CPU already ships
//!
//! "シリコンに焼き込まれた近似"
//!
//! SSE has 12-bit `rsqrtss` / `rcpss` estimates and a correctly rounded `sqrtss`;
//! the x87 FPU has `fyl2x` (`y · log2 x`) and `f2xm1` (`2^x - 1` on `[-1, 1]`).
//! These are the reference points the bit-pattern kernels compete with.
//!
//! Every function checks the capability at runtime (or, for x87, at compile time
//! through the `x87-asm` feature) and falls back to the portable `std` equivalent.

/// Hardware features usable by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// SSE scalar estimate / sqrt instructions.
    pub sse: bool,
    /// x87 `fyl2x` / `f2xm1` through inline assembly.
    pub x87: bool,
}

impl Capabilities {
    #[must_use]
    pub fn detect() -> Self {
        let caps = Self {
            sse: sse_available(),
            x87: cfg!(all(target_arch = "x86_64", feature = "x87-asm")),
        };
        log::debug!("hardware tier: sse={} x87={}", caps.sse, caps.x87);
        caps
    }
}

#[inline(always)]
fn sse_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("sse")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// `rsqrtss`: 1/√x to ~12 bits (relative error ≤ 1.5·2^-12).
#[inline(always)]
pub fn inv_sqrt(x: f32) -> f32 {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: SSE support is checked at runtime via is_x86_feature_detected!.
    // _mm_set_ss, _mm_rsqrt_ss, _mm_cvtss_f32 operate on register values only.
    unsafe {
        if is_x86_feature_detected!("sse") {
            let v = core::arch::x86_64::_mm_set_ss(x);
            return core::arch::x86_64::_mm_cvtss_f32(core::arch::x86_64::_mm_rsqrt_ss(v));
        }
    }
    1.0 / x.sqrt()
}

/// `rcpss`: 1/x to ~12 bits.
#[inline(always)]
pub fn reciprocal(x: f32) -> f32 {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: SSE support is checked at runtime via is_x86_feature_detected!.
    // _mm_set_ss, _mm_rcp_ss, _mm_cvtss_f32 operate on register values only.
    unsafe {
        if is_x86_feature_detected!("sse") {
            let v = core::arch::x86_64::_mm_set_ss(x);
            return core::arch::x86_64::_mm_cvtss_f32(core::arch::x86_64::_mm_rcp_ss(v));
        }
    }
    1.0 / x
}

/// `sqrtss`: correctly rounded √x.
#[inline(always)]
pub fn sqrt(x: f32) -> f32 {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: SSE support is checked at runtime via is_x86_feature_detected!.
    // _mm_set_ss, _mm_sqrt_ss, _mm_cvtss_f32 operate on register values only.
    unsafe {
        if is_x86_feature_detected!("sse") {
            let v = core::arch::x86_64::_mm_set_ss(x);
            return core::arch::x86_64::_mm_cvtss_f32(core::arch::x86_64::_mm_sqrt_ss(v));
        }
    }
    x.sqrt()
}

/// x87 `fyl2x` with `y = 1`: log2 in extended precision, rounded to f32.
#[inline]
pub fn log2(x: f32) -> f32 {
    #[cfg(all(target_arch = "x86_64", feature = "x87-asm"))]
    {
        let mut value = x;
        // SAFETY: `value` is a live, aligned f32 for the duration of the asm block.
        // fld1 and fld push two entries, fyl2x pops one, fstp pops the last, so the
        // x87 stack is balanced; all st registers are declared clobbered. No CPU
        // stack access, hence `nostack`.
        unsafe {
            std::arch::asm!(
                "fld1",
                "fld dword ptr [{p}]",
                "fyl2x",
                "fstp dword ptr [{p}]",
                p = in(reg) &mut value as *mut f32,
                out("st(0)") _, out("st(1)") _, out("st(2)") _, out("st(3)") _,
                out("st(4)") _, out("st(5)") _, out("st(6)") _, out("st(7)") _,
                options(nostack),
            );
        }
        value
    }
    #[cfg(not(all(target_arch = "x86_64", feature = "x87-asm")))]
    {
        x.log2()
    }
}

/// 2^x: x87 `f2xm1` on the fraction, exponent field for the integer part.
///
/// Valid while the integer part stays in `[-126, 127]`.
#[inline]
pub fn exp2(x: f32) -> f32 {
    #[cfg(all(target_arch = "x86_64", feature = "x87-asm"))]
    {
        let int_part = x as i32;
        // f2xm1 needs |frac| <= 1; truncation keeps it in (-1, 1)
        let mut frac = x - int_part as f32;
        // SAFETY: `frac` is a live, aligned f32 for the duration of the asm block.
        // fld pushes one entry, fld1/faddp push and pop one, fstp pops the last: the
        // x87 stack is balanced and all st registers are declared clobbered.
        unsafe {
            std::arch::asm!(
                "fld dword ptr [{p}]",
                "f2xm1",
                "fld1",
                "faddp",
                "fstp dword ptr [{p}]",
                p = in(reg) &mut frac as *mut f32,
                out("st(0)") _, out("st(1)") _, out("st(2)") _, out("st(3)") _,
                out("st(4)") _, out("st(5)") _, out("st(6)") _, out("st(7)") _,
                options(nostack),
            );
        }
        frac * crate::bits::pow2_f32(int_part)
    }
    #[cfg(not(all(target_arch = "x86_64", feature = "x87-asm")))]
    {
        x.exp2()
    }
}
