//! Batch Engine — kernels over whole slices
//!
//! Full 4-lane chunks go through [`crate::simd::kernels`], the tail through the
//! scalar kernel. Because every `*_x4` kernel is bitwise identical to its scalar
//! counterpart, the output never depends on the backend, the slice length or
//! the parallel split.
//!
//! Slices at or above the parallel threshold are cut into `chunk_size` pieces and
//! handed to rayon (feature `parallel`). Chunks are disjoint; no shared state.

use std::fmt;

use crate::fast_math;
use crate::simd::{kernels, Backend, F32x4, LANES};

/// Below this many elements the rayon split costs more than it saves.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;
/// Elements per rayon task.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 14;

/// A kernel that has both a scalar and a 4-wide form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    Log2Linear,
    Log2Bits,
    Log2Rational,
    Exp2Linear,
    Exp2Bits,
    Exp2Rational,
    Exp2RationalFast,
    /// Linear-tier `x^y` with a fixed exponent.
    Pow(f32),
    SqrtEstimate,
    Sqrt,
    InvSqrtEstimate,
    InvSqrt,
    ReciprocalEstimate,
    Reciprocal,
}

impl Kernel {
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Log2Linear => "log2_linear",
            Kernel::Log2Bits => "log2_bits",
            Kernel::Log2Rational => "log2_rational",
            Kernel::Exp2Linear => "exp2_linear",
            Kernel::Exp2Bits => "exp2_bits",
            Kernel::Exp2Rational => "exp2_rational",
            Kernel::Exp2RationalFast => "exp2_rational_fast",
            Kernel::Pow(_) => "pow",
            Kernel::SqrtEstimate => "sqrt_estimate",
            Kernel::Sqrt => "sqrt",
            Kernel::InvSqrtEstimate => "inv_sqrt_estimate",
            Kernel::InvSqrt => "inv_sqrt",
            Kernel::ReciprocalEstimate => "reciprocal_estimate",
            Kernel::Reciprocal => "reciprocal",
        }
    }

    /// Apply to one value.
    #[inline]
    pub fn scalar(self, x: f32) -> f32 {
        match self {
            Kernel::Log2Linear => fast_math::log2_linear(x),
            Kernel::Log2Bits => fast_math::log2_bits(x),
            Kernel::Log2Rational => fast_math::log2_rational(x),
            Kernel::Exp2Linear => fast_math::exp2_linear(x),
            Kernel::Exp2Bits => fast_math::exp2_bits(x),
            Kernel::Exp2Rational => fast_math::exp2_rational(x),
            Kernel::Exp2RationalFast => fast_math::exp2_rational_fast(x),
            Kernel::Pow(y) => fast_math::pow(x, y),
            Kernel::SqrtEstimate => fast_math::sqrt_estimate(x),
            Kernel::Sqrt => fast_math::sqrt(x),
            Kernel::InvSqrtEstimate => fast_math::inv_sqrt_estimate(x),
            Kernel::InvSqrt => fast_math::inv_sqrt(x),
            Kernel::ReciprocalEstimate => fast_math::reciprocal_estimate(x),
            Kernel::Reciprocal => fast_math::reciprocal(x),
        }
    }

    /// Apply to four lanes.
    #[inline]
    pub fn lanes(self, x: F32x4) -> F32x4 {
        match self {
            Kernel::Log2Linear => kernels::log2_linear_x4(x),
            Kernel::Log2Bits => kernels::log2_bits_x4(x),
            Kernel::Log2Rational => kernels::log2_rational_x4(x),
            Kernel::Exp2Linear => kernels::exp2_linear_x4(x),
            Kernel::Exp2Bits => kernels::exp2_bits_x4(x),
            Kernel::Exp2Rational => kernels::exp2_rational_x4(x),
            Kernel::Exp2RationalFast => kernels::exp2_rational_fast_x4(x),
            Kernel::Pow(y) => kernels::pow_x4(x, y),
            Kernel::SqrtEstimate => kernels::sqrt_estimate_x4(x),
            Kernel::Sqrt => kernels::sqrt_x4(x),
            Kernel::InvSqrtEstimate => kernels::inv_sqrt_estimate_x4(x),
            Kernel::InvSqrt => kernels::inv_sqrt_x4(x),
            Kernel::ReciprocalEstimate => kernels::reciprocal_estimate_x4(x),
            Kernel::Reciprocal => kernels::reciprocal_x4(x),
        }
    }
}

/// Output slice length does not match the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[batch] output length {} does not match input length {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for BatchError {}

/// Slice-level kernel dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct BatchEngine {
    backend: Backend,
    parallel_threshold: usize,
    chunk_size: usize,
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchEngine {
    pub fn new() -> Self {
        Self {
            backend: Backend::detect(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Force a backend (e.g. `Backend::Scalar` for comparison runs).
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Minimum slice length for the rayon split. Ignored without feature `parallel`.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Elements per parallel task, rounded up to a whole number of lanes.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size
            .clamp(LANES, usize::MAX - LANES + 1)
            .next_multiple_of(LANES);
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Apply `kernel` to every element of `data` in place.
    pub fn apply(&self, kernel: Kernel, data: &mut [f32]) {
        log::trace!(
            "batch {} over {} elements ({})",
            kernel.name(),
            data.len(),
            self.backend.name()
        );
        #[cfg(feature = "parallel")]
        {
            if data.len() >= self.parallel_threshold {
                use rayon::prelude::*;
                data.par_chunks_mut(self.chunk_size)
                    .for_each(|chunk| self.apply_serial(kernel, chunk));
                return;
            }
        }
        self.apply_serial(kernel, data);
    }

    /// Apply `kernel` to `input`, writing into `output` (same length).
    pub fn map(&self, kernel: Kernel, input: &[f32], output: &mut [f32]) -> Result<(), BatchError> {
        if input.len() != output.len() {
            return Err(BatchError {
                expected: input.len(),
                actual: output.len(),
            });
        }
        output.copy_from_slice(input);
        self.apply(kernel, output);
        Ok(())
    }

    fn apply_serial(&self, kernel: Kernel, data: &mut [f32]) {
        match self.backend {
            Backend::Sse2 => {
                let mut chunks = data.chunks_exact_mut(LANES);
                for chunk in &mut chunks {
                    kernel.lanes(F32x4::load(chunk)).store(chunk);
                }
                for x in chunks.into_remainder() {
                    *x = kernel.scalar(*x);
                }
            }
            Backend::Scalar => {
                for x in data.iter_mut() {
                    *x = kernel.scalar(*x);
                }
            }
        }
    }
}
