//! ALICE-BitMath — fast transcendental approximations from IEEE-754 bit patterns
//!
//! "浮動小数点のビットをそのまま対数として読む"
//!
//! Reading a positive float's bits as an integer gives a scaled, shifted
//! piecewise-linear log2 of its value. Every kernel here builds on that: log2 and
//! exp2 in several accuracy tiers, pow, roots, reciprocals, and the Newton steps
//! that sharpen them.

pub mod bits;
pub mod domain;
pub mod branchless;
pub mod fast_math;
pub mod metrics;

// Deep-Fried Rust: カリッカリ最適化モジュール
pub mod simd;
pub mod hw;
pub mod batch;

pub use batch::{BatchEngine, BatchError, Kernel};
pub use bits::BitFloat;
pub use domain::{Domain, DomainError};
pub use metrics::{percent_error, ErrorStats, Sweep};
pub use simd::Backend;
