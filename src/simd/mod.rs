//! SIMD Engine — 4-lane bit-pattern arithmetic
//!
//! "CPUのシリコンを限界までしゃぶり尽くす"
//!
//! The approximation kernels only need float add/sub/mul/div, int add/sub,
//! and/or, logical shifts and the two int↔float conversions. All of those map
//! one-to-one onto SSE2, which makes SSE2 (4 × f32) the natural width here.
//!
//! - `F32x4` / `U32x4`: lane arrays, `#[repr(C, align(16))]` so they transmute to
//!   `__m128` / `__m128i`
//! - Each op runs SSE2 when detected at runtime, a scalar loop otherwise
//! - `kernels`: 4-wide versions of the scalar kernels, bitwise identical per lane

pub mod kernels;

/// Lanes per vector.
pub const LANES: usize = 4;

/// Instruction set used for vector work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// 128-bit SSE2 (x86_64).
    Sse2,
    /// One element at a time through the scalar kernels.
    Scalar,
}

impl Backend {
    /// Best backend supported by the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        let backend = if sse2_available() {
            Backend::Sse2
        } else {
            Backend::Scalar
        };
        log::debug!("SIMD backend: {}", backend.name());
        backend
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Sse2 => "sse2",
            Backend::Scalar => "scalar",
        }
    }

    /// Elements processed per step.
    #[must_use]
    pub const fn lanes(self) -> usize {
        match self {
            Backend::Sse2 => LANES,
            Backend::Scalar => 1,
        }
    }
}

#[inline(always)]
fn sse2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("sse2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Portable 4-wide f32 vector (maps to SSE `__m128`)
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(16))]
pub struct F32x4 {
    pub v: [f32; 4],
}

impl F32x4 {
    #[inline(always)]
    #[must_use]
    pub const fn splat(val: f32) -> Self {
        Self { v: [val; 4] }
    }

    #[inline(always)]
    #[must_use]
    pub const fn zero() -> Self {
        Self::splat(0.0)
    }

    #[inline(always)]
    #[must_use]
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self { v }
    }

    #[inline(always)]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        self.v
    }

    /// Load from a slice (must have >= 4 elements)
    #[inline(always)]
    #[must_use]
    pub fn load(slice: &[f32]) -> Self {
        assert!(slice.len() >= LANES, "F32x4::load requires >= 4 elements, got {}", slice.len());
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. slice has >= 4 f32 elements (assert above) and
        // _mm_loadu_ps has no alignment requirement. F32x4 is repr(C, align(16)) like __m128.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let v = core::arch::x86_64::_mm_loadu_ps(slice.as_ptr());
                return core::mem::transmute(v);
            }
        }
        let mut v = [0.0f32; 4];
        v.copy_from_slice(&slice[..LANES]);
        Self { v }
    }

    /// Store to a slice (must have >= 4 elements)
    #[inline(always)]
    pub fn store(self, slice: &mut [f32]) {
        assert!(slice.len() >= LANES, "F32x4::store requires >= 4 elements, got {}", slice.len());
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. slice has >= 4 f32 elements (assert above) and
        // _mm_storeu_ps is unaligned. F32x4 matches __m128 in size and alignment.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                core::arch::x86_64::_mm_storeu_ps(slice.as_mut_ptr(), core::mem::transmute(self));
                return;
            }
        }
        slice[..LANES].copy_from_slice(&self.v);
    }

    /// Element-wise addition
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 is repr(C, align(16)) matching __m128 layout.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128 = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_add_ps(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] + rhs.v[i]) }
    }

    /// Element-wise subtraction
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn sub(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 is repr(C, align(16)) matching __m128 layout.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128 = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_sub_ps(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] - rhs.v[i]) }
    }

    /// Element-wise multiplication
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn mul(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 is repr(C, align(16)) matching __m128 layout.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128 = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_mul_ps(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] * rhs.v[i]) }
    }

    /// Element-wise division (IEEE, same rounding as scalar `/`)
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn div(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 is repr(C, align(16)) matching __m128 layout.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128 = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_div_ps(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] / rhs.v[i]) }
    }

    /// Compare less-than, returns mask (all 1s or all 0s per lane)
    #[inline(always)]
    #[must_use]
    pub fn cmp_lt(self, rhs: Self) -> U32x4 {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 and U32x4 are both 16 bytes, align(16),
        // matching __m128; the mask lanes are plain bit patterns.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128 = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_cmplt_ps(a, b));
            }
        }
        U32x4 {
            v: std::array::from_fn(|i| crate::branchless::mask_u32(self.v[i] < rhs.v[i])),
        }
    }

    /// Truncating conversion to i32 per lane (`cvttps2dq`), returned as raw bits.
    ///
    /// NaN and out-of-range lanes give `0x8000_0000` on both paths.
    #[inline(always)]
    #[must_use]
    pub fn trunc_i32(self) -> U32x4 {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. F32x4 matches __m128 and U32x4 matches __m128i
        // (16 bytes, align(16)).
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128 = core::mem::transmute(self);
                return core::mem::transmute(core::arch::x86_64::_mm_cvttps_epi32(a));
            }
        }
        U32x4 { v: std::array::from_fn(|i| crate::bits::trunc_i32(self.v[i]) as u32) }
    }

    /// Reinterpret lanes as bit patterns (no conversion).
    #[inline(always)]
    #[must_use]
    pub fn to_bits(self) -> U32x4 {
        U32x4 { v: bytemuck::cast(self.v) }
    }

    /// Reinterpret bit patterns as lanes (no conversion).
    #[inline(always)]
    #[must_use]
    pub fn from_bits(bits: U32x4) -> Self {
        Self { v: bytemuck::cast(bits.v) }
    }
}

/// Portable 4-wide u32 vector (maps to SSE2 `__m128i`). Also used as a lane mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct U32x4 {
    pub v: [u32; 4],
}

impl U32x4 {
    #[inline(always)]
    #[must_use]
    pub const fn splat(val: u32) -> Self {
        Self { v: [val; 4] }
    }

    #[inline(always)]
    #[must_use]
    pub const fn from_array(v: [u32; 4]) -> Self {
        Self { v }
    }

    /// Wrapping element-wise addition
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128i = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_add_epi32(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i].wrapping_add(rhs.v[i])) }
    }

    /// Wrapping element-wise subtraction
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    #[must_use]
    pub fn sub(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128i = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_sub_epi32(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i].wrapping_sub(rhs.v[i])) }
    }

    /// Bitwise AND
    #[inline(always)]
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128i = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_and_si128(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] & rhs.v[i]) }
    }

    /// Bitwise OR
    #[inline(always)]
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                let b: core::arch::x86_64::__m128i = core::mem::transmute(rhs);
                return core::mem::transmute(core::arch::x86_64::_mm_or_si128(a, b));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] | rhs.v[i]) }
    }

    /// Logical shift right by `N` bits
    #[inline(always)]
    #[must_use]
    pub fn shr<const N: i32>(self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                return core::mem::transmute(core::arch::x86_64::_mm_srli_epi32::<N>(a));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] >> N) }
    }

    /// Logical shift left by `N` bits
    #[inline(always)]
    #[must_use]
    pub fn shl<const N: i32>(self) -> Self {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 is repr(C, align(16)) matching __m128i.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                return core::mem::transmute(core::arch::x86_64::_mm_slli_epi32::<N>(a));
            }
        }
        Self { v: std::array::from_fn(|i| self.v[i] << N) }
    }

    /// Numeric conversion of each lane read as `i32` (`cvtdq2ps`).
    #[inline(always)]
    #[must_use]
    pub fn convert_i32_to_f32(self) -> F32x4 {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 matches __m128i and F32x4 matches __m128.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                let a: core::arch::x86_64::__m128i = core::mem::transmute(self);
                return core::mem::transmute(core::arch::x86_64::_mm_cvtepi32_ps(a));
            }
        }
        F32x4 { v: std::array::from_fn(|i| self.v[i] as i32 as f32) }
    }

    /// Branchless blend with `self` as mask: `a` where set, `b` where clear.
    ///
    /// mask.select(a, b) ≡ (mask & a) | (!mask & b)
    #[inline(always)]
    #[must_use]
    pub fn select(self, a: F32x4, b: F32x4) -> F32x4 {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: SSE2 is checked at runtime. U32x4 and F32x4 are 16 bytes, align(16),
        // matching __m128; the bitwise ops work on raw lanes.
        unsafe {
            if is_x86_feature_detected!("sse2") {
                use core::arch::x86_64::{__m128, _mm_and_ps, _mm_andnot_ps, _mm_or_ps};
                let mask: __m128 = core::mem::transmute(self);
                let va: __m128 = core::mem::transmute(a);
                let vb: __m128 = core::mem::transmute(b);
                return core::mem::transmute(_mm_or_ps(_mm_and_ps(mask, va), _mm_andnot_ps(mask, vb)));
            }
        }
        let a_bits = a.to_bits();
        let b_bits = b.to_bits();
        F32x4::from_bits(U32x4 {
            v: std::array::from_fn(|i| (a_bits.v[i] & self.v[i]) | (b_bits.v[i] & !self.v[i])),
        })
    }
}
