//! Built-in scenario presets.
//!
//! Ready-to-run templates for common risk analyses. Each preset bundles a
//! small set of variables with a positive-definite default correlation;
//! callers adjust them through scenario overrides rather than editing the
//! catalogue.

use sim_models::correlation::CorrelationMatrix;
use sim_models::distributions::DistributionSpec;
use sim_models::variables::{PathDynamics, VariableSpec};

use super::template::ScenarioTemplate;

/// Builds a template from parts known valid at compile time.
fn template(
    name: &str,
    description: &str,
    variables: Vec<VariableSpec>,
    correlation: &[f64],
) -> ScenarioTemplate {
    let dim = variables.len();
    // Preset matrices are literal and positive definite; the preset test
    // suite asserts both, so construction cannot fail here
    let matrix = CorrelationMatrix::new(correlation, dim)
        .expect("preset correlation matrix is valid");
    ScenarioTemplate::new(name, description, variables, matrix)
        .expect("preset template is valid")
}

/// Annual portfolio return drivers with mildly offsetting asset classes.
fn portfolio_baseline() -> ScenarioTemplate {
    #[rustfmt::skip]
    let correlation = [
        1.0, -0.2, 0.1,
        -0.2, 1.0, -0.3,
        0.1, -0.3, 1.0,
    ];
    template(
        "portfolio_baseline",
        "Annual return drivers for a balanced equity/bond portfolio",
        vec![
            VariableSpec::new(
                "equity_return",
                DistributionSpec::Normal {
                    mean: 0.07,
                    std_dev: 0.15,
                },
            )
            .with_unit("fraction"),
            VariableSpec::new(
                "bond_return",
                DistributionSpec::Normal {
                    mean: 0.03,
                    std_dev: 0.05,
                },
            )
            .with_unit("fraction"),
            VariableSpec::new(
                "inflation",
                DistributionSpec::Normal {
                    mean: 0.025,
                    std_dev: 0.01,
                },
            )
            .with_unit("fraction"),
        ],
        &correlation,
    )
}

/// Project cost drivers with right-skewed labour and event severity.
fn project_cost() -> ScenarioTemplate {
    #[rustfmt::skip]
    let correlation = [
        1.0, 0.5, 0.3,
        0.5, 1.0, 0.2,
        0.3, 0.2, 1.0,
    ];
    template(
        "project_cost",
        "Cost drivers for a fixed-scope delivery project",
        vec![
            VariableSpec::new(
                "labour_cost",
                // exp(13.8) ~ 985k: right-skewed around the planning figure
                DistributionSpec::LogNormal {
                    location: 13.8,
                    scale: 0.25,
                },
            )
            .with_unit("USD"),
            VariableSpec::new(
                "material_cost",
                DistributionSpec::Triangular {
                    low: 400_000.0,
                    mode: 500_000.0,
                    high: 750_000.0,
                },
            )
            .with_unit("USD"),
            VariableSpec::new(
                "risk_event_severity",
                DistributionSpec::Beta {
                    alpha: 2.0,
                    beta: 8.0,
                },
            )
            .with_unit("fraction"),
        ],
        &correlation,
    )
}

/// Revenue drivers with a path-dependent adoption walk for time-series
/// runs.
fn revenue_forecast() -> ScenarioTemplate {
    #[rustfmt::skip]
    let correlation = [
        1.0, -0.4, -0.2,
        -0.4, 1.0, 0.1,
        -0.2, 0.1, 1.0,
    ];
    template(
        "revenue_forecast",
        "Monthly revenue drivers with a path-dependent volume walk",
        vec![
            VariableSpec::new(
                "units_sold",
                DistributionSpec::Normal {
                    mean: 10_000.0,
                    std_dev: 2_000.0,
                },
            )
            .with_unit("units")
            .with_path(PathDynamics {
                drift: 150.0,
                volatility: 400.0,
            }),
            VariableSpec::new(
                "unit_price",
                DistributionSpec::Normal {
                    mean: 10.0,
                    std_dev: 1.5,
                },
            )
            .with_unit("USD"),
            VariableSpec::new(
                "churn_rate",
                DistributionSpec::Beta {
                    alpha: 1.5,
                    beta: 10.0,
                },
            )
            .with_unit("fraction"),
        ],
        &correlation,
    )
}

/// Returns the built-in preset catalogue.
pub fn builtin() -> Vec<ScenarioTemplate> {
    vec![portfolio_baseline(), project_cost(), revenue_forecast()]
}
