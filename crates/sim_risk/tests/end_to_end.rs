//! End-to-end properties of the full engine stack.
//!
//! These tests exercise the facade the way a calling layer would and pin
//! down the statistical contracts: marginal support, correlation
//! recovery, interval calibration, VaR accuracy, fail-fast bounds, and
//! strict handling of caller-supplied correlation matrices.

use rand::rngs::StdRng;
use rand::SeedableRng;

use sim_engine::error::ConfigError;
use sim_engine::{SimRng, SimulationConfig};
use sim_models::correlation::{estimate, CorrelationMatrix};
use sim_models::distributions::DistributionSpec;
use sim_models::variables::VariableSpec;
use sim_risk::analysis::percentile_interval;
use sim_risk::{EngineError, ScenarioOverrides, SimulationEngine, SimulationRequest};

fn normal_var(name: &str, mean: f64, std_dev: f64) -> VariableSpec {
    VariableSpec::new(name, DistributionSpec::Normal { mean, std_dev })
}

fn config(iterations: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .iterations(iterations)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn all_families_draw_finite_in_support_samples() {
    let specs = [
        DistributionSpec::Normal {
            mean: 10.0,
            std_dev: 3.0,
        },
        DistributionSpec::LogNormal {
            location: 1.0,
            scale: 0.4,
        },
        DistributionSpec::Beta {
            alpha: 2.0,
            beta: 5.0,
        },
        DistributionSpec::Uniform {
            min: -2.0,
            max: 9.0,
        },
        DistributionSpec::Triangular {
            low: 1.0,
            mode: 3.0,
            high: 8.0,
        },
        DistributionSpec::Empirical {
            edges: vec![0.0, 1.0, 3.0, 6.0],
            weights: vec![0.2, 0.5, 0.3],
        },
    ];

    let mut rng = StdRng::seed_from_u64(17);
    for spec in &specs {
        let samples = spec.sample(&mut rng, 1_000).unwrap();
        assert_eq!(samples.len(), 1_000);
        let (lo, hi) = spec.support();
        for value in &samples {
            assert!(value.is_finite());
            assert!(
                *value >= lo && *value <= hi,
                "draw {} outside support [{}, {}] for {:?}",
                value,
                lo,
                hi,
                spec.kind()
            );
        }
    }
}

#[test]
fn random_correlation_matrices_satisfy_invariants_up_to_dim_50() {
    let mut rng = StdRng::seed_from_u64(23);
    for dim in 2..=50 {
        let (matrix, _adjusted) = CorrelationMatrix::random(dim, &mut rng);
        for i in 0..dim {
            assert!((matrix.get(i, i) - 1.0).abs() < 1e-9);
            for j in 0..dim {
                assert!((matrix.get(i, j) - matrix.get(j, i)).abs() < 1e-12);
                assert!((-1.0..=1.0).contains(&matrix.get(i, j)));
            }
        }
        assert!(
            matrix.min_eigenvalue() >= -1e-8,
            "dim {} matrix has eigenvalue {}",
            dim,
            matrix.min_eigenvalue()
        );
    }
}

#[test]
fn copula_recovers_target_correlation_for_gaussian_marginals() {
    #[rustfmt::skip]
    let target = [
        1.0, 0.6, -0.3,
        0.6, 1.0, 0.2,
        -0.3, 0.2, 1.0,
    ];
    let engine = SimulationEngine::with_builtin_scenarios();
    let request = SimulationRequest {
        variables: vec![
            normal_var("a", 0.0, 1.0),
            normal_var("b", 5.0, 2.0),
            normal_var("c", -3.0, 0.5),
        ],
        correlation: Some(CorrelationMatrix::new(&target, 3).unwrap()),
        config: config(20_000, 41),
        loss: None,
    };

    let set = engine.draw_samples(&request).unwrap();
    let estimated = estimate(set.columns()).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            let diff = (estimated.get(i, j) - target[i * 3 + j]).abs();
            assert!(
                diff < 0.05,
                "correlation ({}, {}) off by {}",
                i,
                j,
                diff
            );
        }
    }
}

#[test]
fn confidence_intervals_are_calibrated() {
    // 1000 repeated trials of normal(100, 10): the 95% percentile interval
    // must contain the true mean in at least 94% of them
    let spec = DistributionSpec::Normal {
        mean: 100.0,
        std_dev: 10.0,
    };
    let mut rng = SimRng::from_seed(7);
    let mut hits = 0;
    let trials = 1_000;

    for _ in 0..trials {
        let samples = spec.sample(&mut rng, 1_000).unwrap();
        let interval = percentile_interval(&samples, 0.95);
        if interval.contains(100.0) {
            hits += 1;
        }
    }

    let hit_rate = hits as f64 / trials as f64;
    assert!(
        hit_rate >= 0.94,
        "interval contained the true mean in only {:.1}% of trials",
        hit_rate * 100.0
    );
}

#[test]
fn iteration_bounds_are_enforced_at_the_boundary() {
    assert!(matches!(
        SimulationConfig::builder().iterations(999).build(),
        Err(ConfigError::InvalidIterationCount { value: 999 })
    ));
    assert!(SimulationConfig::builder().iterations(1_000).build().is_ok());
    assert!(SimulationConfig::builder().iterations(100_000).build().is_ok());
    assert!(matches!(
        SimulationConfig::builder().iterations(100_001).build(),
        Err(ConfigError::InvalidIterationCount { value: 100_001 })
    ));
}

#[test]
fn end_to_end_correlated_risk_run() {
    // X ~ N(100, 10), Y ~ N(50, 5), target correlation 0.8
    let engine = SimulationEngine::with_builtin_scenarios();
    let request = SimulationRequest {
        variables: vec![normal_var("x", 100.0, 10.0), normal_var("y", 50.0, 5.0)],
        correlation: Some(CorrelationMatrix::new(&[1.0, 0.8, 0.8, 1.0], 2).unwrap()),
        config: config(20_000, 42),
        loss: None,
    };

    // Correlation estimate lands inside [0.75, 0.85]
    let set = engine.draw_samples(&request).unwrap();
    let estimated = estimate(set.columns()).unwrap();
    let rho = estimated.get(0, 1);
    assert!(
        (0.75..=0.85).contains(&rho),
        "estimated correlation {} outside [0.75, 0.85]",
        rho
    );

    // VaR_95 of X sits within 2 units of the theoretical 83.55
    let result = engine.run_custom_simulation(&request).unwrap();
    assert!(
        (result.risk_metrics.var_95 - 83.55).abs() < 2.0,
        "VaR_95 {} too far from 83.55",
        result.risk_metrics.var_95
    );
    assert!(result.risk_metrics.cvar_95 <= result.risk_metrics.var_95);
    assert!(!result.matrix_adjusted);

    // The marginals come through intact
    let x_stats = &result.statistics["x"];
    assert!((x_stats.mean - 100.0).abs() < 0.5);
    assert!((x_stats.std_dev - 10.0).abs() < 0.5);
    let y_stats = &result.statistics["y"];
    assert!((y_stats.mean - 50.0).abs() < 0.25);

    // 20k draws of a static normal converge comfortably at 1%
    assert!(result.convergence.converged);
}

#[test]
fn caller_supplied_indefinite_matrix_is_rejected_not_adjusted() {
    // Equicorrelated ρ = -0.65: eigenvalue -0.3, far beyond repair
    let rho = -0.65;
    #[rustfmt::skip]
    let data = [
        1.0, rho, rho,
        rho, 1.0, rho,
        rho, rho, 1.0,
    ];
    let engine = SimulationEngine::with_builtin_scenarios();
    let request = SimulationRequest {
        variables: vec![
            normal_var("a", 0.0, 1.0),
            normal_var("b", 0.0, 1.0),
            normal_var("c", 0.0, 1.0),
        ],
        correlation: Some(CorrelationMatrix::new(&data, 3).unwrap()),
        config: config(1_000, 3),
        loss: None,
    };

    let err = engine.run_custom_simulation(&request).unwrap_err();
    assert!(err.is_not_positive_definite());

    // Same strict behaviour when the matrix arrives as a scenario override
    let overrides = ScenarioOverrides {
        correlation: Some(CorrelationMatrix::new(&data, 3).unwrap()),
        ..Default::default()
    };
    let err = engine
        .run_scenario_simulation("portfolio_baseline", &overrides, &config(1_000, 3))
        .unwrap_err();
    assert!(err.is_not_positive_definite());
}

#[test]
fn scenario_time_series_horizon_is_analysed() {
    let engine = SimulationEngine::with_builtin_scenarios();
    let config = SimulationConfig::builder()
        .iterations(2_000)
        .time_steps(6)
        .seed(8)
        .build()
        .unwrap();

    let result = engine
        .run_scenario_simulation("revenue_forecast", &ScenarioOverrides::none(), &config)
        .unwrap();

    // The path-dependent volume walk drifts upward over 6 steps
    let units = &result.statistics["units_sold"];
    assert!(
        units.mean > 10_000.0,
        "units_sold mean {} did not drift upward",
        units.mean
    );

    // The raw series exposes every step, drifting monotonically in mean
    let series = engine
        .run_time_series_simulation("revenue_forecast", &ScenarioOverrides::none(), &config)
        .unwrap();
    assert_eq!(series.len(), 6);
    let mean_of = |step: &sim_engine::SampleSet| {
        let column = step.column("units_sold").unwrap();
        column.iter().sum::<f64>() / column.len() as f64
    };
    assert!(mean_of(&series[5]) > mean_of(&series[0]));
}

#[test]
fn results_serialise_for_reporting_collaborators() {
    let engine = SimulationEngine::with_builtin_scenarios();
    let request = SimulationRequest {
        variables: vec![normal_var("x", 0.0, 1.0)],
        correlation: None,
        config: config(1_000, 1),
        loss: None,
    };
    let result = engine.run_custom_simulation(&request).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"statistics\""));
    assert!(json.contains("\"risk_metrics\""));
    assert!(json.contains("\"convergence\""));
    assert!(json.contains("\"matrix_adjusted\""));

    let back: sim_risk::SimulationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
}

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SimulationEngine>();
}

#[test]
fn error_values_carry_the_offending_field() {
    let engine = SimulationEngine::with_builtin_scenarios();

    let request = SimulationRequest {
        variables: vec![VariableSpec::new(
            "x",
            DistributionSpec::Beta {
                alpha: -2.0,
                beta: 1.0,
            },
        )],
        correlation: None,
        config: config(1_000, 1),
        loss: None,
    };

    let err = engine.run_custom_simulation(&request).unwrap_err();
    match err {
        EngineError::Distribution(inner) => {
            let msg = inner.to_string();
            assert!(msg.contains("alpha"));
            assert!(msg.contains("-2"));
        }
        other => panic!("expected a distribution error, got {:?}", other),
    }
}
