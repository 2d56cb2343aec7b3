//! Cross-module properties of the approximation kernels.

use alice_bitmath::batch::{BatchEngine, Kernel};
use alice_bitmath::fast_math::{
    exp2_bits, exp2_linear, exp2_quadratic, exp2_rational, inv_sqrt, inv_sqrt_estimate,
    inv_sqrt_precise, log2_bits, log2_linear, log2_quartic, log2_rational, pow, pow_via_log2,
    pow_via_log2_fast,
};
use alice_bitmath::simd::{kernels, Backend, F32x4};
use alice_bitmath::{hw, percent_error, Domain, Sweep};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Geometric sweep over `[lo, hi]`.
fn geometric(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f32> {
    let ratio = hi / lo;
    (0..n).map(move |i| (lo * ratio.powf(i as f64 / (n - 1) as f64)) as f32)
}

#[test]
fn test_exp2_inverts_log2_per_tier() {
    for x in geometric(0.01, 1000.0, 4000) {
        let err = percent_error(x, exp2_linear(log2_linear(x))).abs();
        assert!(err < 0.01, "linear pair at {}: {}%", x, err);
        let err = percent_error(x, exp2_bits(log2_bits(x))).abs();
        assert!(err < 0.5, "bits pair at {}: {}%", x, err);
        let err = percent_error(x, exp2_rational(log2_rational(x))).abs();
        assert!(err < 0.02, "rational pair at {}: {}%", x, err);
    }
}

#[test]
fn test_pow_identities() {
    for x in geometric(0.01, 1000.0, 4000) {
        let err = percent_error(x, pow(x, 1.0)).abs();
        assert!(err < 0.001, "pow({}, 1): {}%", x, err);
        let err = percent_error(1.0, pow(x, 0.0)).abs();
        assert!(err < 2.2, "pow({}, 0): {}%", x, err);
    }
}

#[test]
fn test_pow_via_log2_tracks_powf() {
    for x in geometric(0.5, 50.0, 500) {
        let exact = (x as f64).powf(1.45) as f32;
        let err = percent_error(exact, pow_via_log2(x, 1.45)).abs();
        assert!(err < 0.03, "pow_via_log2({}, 1.45): {}%", x, err);
    }
}

#[test]
fn test_inv_sqrt_squared_times_x_is_one() {
    for x in geometric(0.001, 1e6, 5000) {
        let y = inv_sqrt(x) as f64;
        let err = percent_error(1.0, y * y * x as f64).abs();
        assert!(err < 0.5, "inv_sqrt({})² · x: {}%", x, err);
    }
}

#[test]
fn test_log2_monotonicity() {
    let xs: Vec<f32> = geometric(0.01, 1000.0, 30_000).collect();
    for w in xs.windows(2) {
        assert!(log2_linear(w[0]) <= log2_linear(w[1]), "linear at {}", w[0]);
        assert!(log2_bits(w[0]) <= log2_bits(w[1]), "bits at {}", w[0]);
        assert!(log2_rational(w[0]) <= log2_rational(w[1]), "rational at {}", w[0]);
    }
    // quartic steps down when crossing into the next binade
    let below_two = f32::from_bits(2.0f32.to_bits() - 1);
    assert!(log2_quartic(below_two) > log2_quartic(2.0));
}

#[test]
fn test_known_values() {
    assert_eq!(log2_bits(4.0), 2.0);
    assert_eq!(exp2_bits(3.0), 8.0);
    assert!(percent_error(8.0, exp2_rational(3.0)).abs() < 0.01);

    assert!(percent_error(0.5, inv_sqrt_estimate(4.0f32)).abs() < 3.5);
    assert!(percent_error(0.5, inv_sqrt(4.0f32)).abs() < 0.2);
    assert!(percent_error(0.5, inv_sqrt_precise(4.0f32)).abs() < 0.01);
}

#[test]
fn test_vector_kernels_match_scalar_on_powers_of_two() {
    let input = [1.0f32, 2.0, 4.0, 8.0];
    let x = F32x4::from_array(input);
    let checks: [(&str, F32x4, fn(f32) -> f32); 5] = [
        ("log2_bits", kernels::log2_bits_x4(x), log2_bits),
        ("log2_rational", kernels::log2_rational_x4(x), log2_rational),
        ("log2_linear", kernels::log2_linear_x4(x), log2_linear::<f32>),
        ("inv_sqrt", kernels::inv_sqrt_x4(x), inv_sqrt::<f32>),
        ("exp2_rational", kernels::exp2_rational_x4(x), exp2_rational),
    ];
    for (name, vector, scalar) in checks {
        for (lane, &v) in input.iter().enumerate() {
            assert_eq!(
                vector.to_array()[lane].to_bits(),
                scalar(v).to_bits(),
                "{} lane {}",
                name,
                lane
            );
        }
    }
}

#[test]
fn test_batch_engine_is_backend_independent() {
    init_logging();
    let input: Vec<f32> = geometric(0.01, 5000.0, 100_003).collect();
    let reference = BatchEngine::new()
        .with_backend(Backend::Scalar)
        .with_parallel_threshold(usize::MAX);
    let engines = [
        BatchEngine::new().with_backend(Backend::Sse2),
        BatchEngine::new().with_parallel_threshold(1024).with_chunk_size(1000),
        BatchEngine::new().with_backend(Backend::Scalar).with_parallel_threshold(0),
    ];
    for kernel in [Kernel::Log2Rational, Kernel::InvSqrt, Kernel::Pow(0.75), Kernel::Reciprocal] {
        let mut want = vec![0.0f32; input.len()];
        reference.map(kernel, &input, &mut want).unwrap();
        for engine in &engines {
            let mut got = vec![0.0f32; input.len()];
            engine.map(kernel, &input, &mut got).unwrap();
            let same = got.iter().zip(&want).all(|(a, b)| a.to_bits() == b.to_bits());
            assert!(same, "{} differs on {:?}", kernel.name(), engine);
        }
    }
}

#[test]
fn test_hardware_estimate_beats_bit_estimate() {
    init_logging();
    let exact = |x: f64| 1.0 / x.sqrt();
    let bits = Sweep::new(0.01, 100.0).run(exact, |x| inv_sqrt_estimate(x as f32) as f64);
    let silicon = Sweep::new(0.01, 100.0).run(exact, |x| hw::inv_sqrt(x as f32) as f64);
    assert!(bits.max_error.abs() > 1.0, "{:?}", bits);
    assert!(silicon.max_error.abs() < bits.max_error.abs(), "{:?} vs {:?}", silicon, bits);
}

#[test]
fn test_domain_describes_kernel_inputs() {
    assert!(Domain::Positive.contains(1e-30));
    assert!(!Domain::Positive.contains(0.0));
    let err = Domain::Positive.validate("log2_rational", -1.0).unwrap_err();
    assert!(err.to_string().starts_with("[log2_rational]"), "{}", err);
}

#[cfg(not(feature = "domain-checks"))]
#[test]
fn test_documented_failures_stay_failures() {
    let err = percent_error(2f32.powf(-2.5), exp2_quadratic(-2.5)).abs();
    assert!(err > 50.0, "exp2_quadratic(-2.5) error {}%", err);
    assert!(pow_via_log2_fast(-2.0, 1.45).abs() > 1e6);
    assert!((log2_bits(-8.0) - 3.0).abs() > 1.0);
}
