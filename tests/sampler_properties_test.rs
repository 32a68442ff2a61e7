// tests/sampler_properties_test.rs
mod common;

use gbm_pricer::mc::sampler::{generate_terminal, generate_trajectory, terminal_normals};
use gbm_pricer::rng;
use gbm_pricer::{ModelParameters, SampleShape, VarianceReduction};
use ndarray::{s, Axis};

fn reference_params() -> ModelParameters {
    ModelParameters::new(100.0, 0.05, 0.2, 1.0).expect("valid parameters")
}

#[test]
fn test_terminal_mean_converges_to_forward() {
    common::init_tracing();
    let params = reference_params();
    let n = 400_000;

    let batch = generate_terminal(
        &SampleShape::terminal(n),
        &params,
        VarianceReduction::NONE,
        &mut rng::seed_rng_from_u64(1),
    )
    .unwrap();

    let mean = batch.mean().unwrap();
    let std_error = batch.std(1.0) / (n as f64).sqrt();
    let forward = 100.0 * (0.05f64).exp();

    println!("\nTerminal mean: {} (expected {}), SE {}", mean, forward, std_error);
    assert!((mean - forward).abs() < 4.0 * std_error);
}

#[test]
fn test_terminal_samples_are_positive_and_finite() {
    let params = ModelParameters::new(50.0, -0.02, 0.9, 3.0).unwrap();
    let batch = generate_terminal(
        &SampleShape::terminal(10_000).with_repeats(5),
        &params,
        VarianceReduction::ANTITHETIC | VarianceReduction::MOMENT_MATCHING,
        &mut rng::seed_rng_from_u64(2),
    )
    .unwrap();
    assert!(batch.iter().all(|&s| s > 0.0 && s.is_finite()));
}

#[test]
fn test_trajectory_starts_at_s0_for_every_shape() {
    let a = reference_params();
    let b = ModelParameters::new(37.5, 0.02, 0.3, 0.25).unwrap();
    let shapes = [
        SampleShape::trajectory(10, 1),
        SampleShape::trajectory(10, 7).with_repeats(4),
        SampleShape::trajectory(3, 50).with_repeats(2).with_parameter_sets(2),
    ];

    for shape in shapes {
        let params: Vec<ModelParameters> = if shape.sets() == 2 { vec![a, b] } else { vec![a] };
        for reduction in [
            VarianceReduction::NONE,
            VarianceReduction::ANTITHETIC,
            VarianceReduction::MOMENT_MATCHING,
            VarianceReduction::ANTITHETIC | VarianceReduction::MOMENT_MATCHING,
        ] {
            let paths =
                generate_trajectory(&shape, &params, reduction, &mut rng::seed_rng_from_u64(3))
                    .unwrap();
            for (j, p) in params.iter().enumerate() {
                let initial = paths.slice(s![.., 0, .., j]);
                assert!(initial.iter().all(|&v| v == p.s0()), "{:?} {:?}", shape, reduction);
            }
        }
    }
}

#[test]
fn test_trajectory_last_slice_has_terminal_marginal() {
    let params = reference_params();
    let n = 100_000;
    let paths = generate_trajectory(
        &SampleShape::trajectory(n, 16),
        &params,
        VarianceReduction::NONE,
        &mut rng::seed_rng_from_u64(4),
    )
    .unwrap();

    let terminal = paths.index_axis(Axis(1), 16);
    let log_returns = terminal.mapv(|s| (s / 100.0).ln());

    // ln(S_T/S_0) ~ N((r - σ²/2)T, σ²T)
    let mean = log_returns.mean().unwrap();
    let var = log_returns.var(1.0);
    let mean_se = (0.04f64 / n as f64).sqrt();
    assert!((mean - 0.03).abs() < 4.0 * mean_se, "log mean {}", mean);
    assert!((var - 0.04).abs() < 0.002, "log variance {}", var);
}

#[test]
fn test_antithetic_mean_closer_than_plain_on_average() {
    let params = reference_params();
    let forward = 100.0 * (0.05f64).exp();
    let repeats = 200;

    // Same number of terminal samples per estimate: 1000
    let antithetic = generate_terminal(
        &SampleShape::terminal(500).with_repeats(repeats),
        &params,
        VarianceReduction::ANTITHETIC,
        &mut rng::seed_rng_from_u64(5),
    )
    .unwrap();
    let plain = generate_terminal(
        &SampleShape::terminal(1_000).with_repeats(repeats),
        &params,
        VarianceReduction::NONE,
        &mut rng::seed_rng_from_u64(6),
    )
    .unwrap();
    assert_eq!(antithetic.len_of(Axis(0)), plain.len_of(Axis(0)));

    let mse = |batch: &ndarray::Array3<f64>| {
        batch
            .mean_axis(Axis(0))
            .unwrap()
            .mapv(|m| (m - forward).powi(2))
            .mean()
            .unwrap()
    };
    let antithetic_mse = mse(&antithetic);
    let plain_mse = mse(&plain);
    println!("\nAntithetic MSE: {}, plain MSE: {}", antithetic_mse, plain_mse);

    assert!(antithetic_mse < plain_mse);
}

#[test]
fn test_terminal_moment_matching_is_exact() {
    let shape = SampleShape::terminal(1_000).with_repeats(3).with_parameter_sets(2);
    for reduction in [
        VarianceReduction::MOMENT_MATCHING,
        VarianceReduction::ANTITHETIC | VarianceReduction::MOMENT_MATCHING,
    ] {
        let z = terminal_normals(&shape, reduction, &mut rng::seed_rng_from_u64(7)).unwrap();
        for lane in z.lanes(Axis(0)) {
            assert!(lane.mean().unwrap().abs() < 1e-12);
            assert!((lane.std(0.0) - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn test_trajectory_moment_matching_is_exact() {
    let a = reference_params();
    let b = ModelParameters::new(80.0, 0.03, 0.4, 2.0).unwrap();
    let steps = 20;
    let shape = SampleShape::trajectory(1_000, steps)
        .with_repeats(3)
        .with_parameter_sets(2);

    let paths = generate_trajectory(
        &shape,
        &[a, b],
        VarianceReduction::ANTITHETIC | VarianceReduction::MOMENT_MATCHING,
        &mut rng::seed_rng_from_u64(8),
    )
    .unwrap();

    for (j, p) in [a, b].iter().enumerate() {
        for k in 0..=steps {
            let t_k = p.t() * k as f64 / steps as f64;
            let expected = p.s0() * (p.r() * t_k).exp();
            for rep in 0..3 {
                let mean = paths.slice(s![.., k, rep, j]).mean().unwrap();
                assert!(
                    ((mean - expected) / expected).abs() < 1e-12,
                    "set {} step {} repeat {}: {} vs {}",
                    j,
                    k,
                    rep,
                    mean,
                    expected
                );
            }
        }
    }
}

#[test]
fn test_same_seed_same_samples() {
    let params = reference_params();
    let shape = SampleShape::trajectory(100, 10);
    let a = generate_trajectory(&shape, &params, VarianceReduction::ANTITHETIC, &mut rng::seed_rng_from_u64(9))
        .unwrap();
    let b = generate_trajectory(&shape, &params, VarianceReduction::ANTITHETIC, &mut rng::seed_rng_from_u64(9))
        .unwrap();
    assert_eq!(a, b);
}
