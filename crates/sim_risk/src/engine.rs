//! The engine facade.
//!
//! [`SimulationEngine`] is the single entry point of the engine: it
//! resolves named scenarios against the injected registry, validates
//! requests fail-fast, delegates sampling to the kernel, and reduces the
//! resulting sample set to a [`SimulationResult`].
//!
//! The engine holds no mutable state — each call is a pure function of the
//! request and the read-only registry — so one instance may serve many
//! threads concurrently without locking. There are no async entry points;
//! hosts with cooperative schedulers run calls on a worker thread and
//! cancel by abandoning the task.

use sim_engine::error::ConfigError;
use sim_engine::{run_single_pass, run_time_series, SampleSet, SimRng, SimulationConfig};
use sim_models::correlation::{factorize, CorrelationMatrix, Factorized, RepairPolicy};
use sim_models::distributions::DistributionKind;
use sim_models::variables::VariableSpec;

use crate::analysis::{
    compute_risk_metrics, convergence_analysis, intervals_for_set, summarize_set,
};
use crate::error::EngineError;
use crate::request::{validate_variables, LossSpec, ScenarioOverrides, SimulationRequest};
use crate::result::{ScenarioInfo, SimulationResult};
use crate::scenarios::{ScenarioRegistry, ScenarioTemplate};

/// The engine facade.
///
/// # Examples
///
/// ```
/// use sim_engine::SimulationConfig;
/// use sim_risk::{ScenarioOverrides, SimulationEngine};
///
/// let engine = SimulationEngine::with_builtin_scenarios();
/// let config = SimulationConfig::builder()
///     .iterations(2_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let result = engine
///     .run_scenario_simulation("portfolio_baseline", &ScenarioOverrides::none(), &config)
///     .unwrap();
/// assert_eq!(result.iterations, 2_000);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    registry: ScenarioRegistry,
}

impl SimulationEngine {
    /// Creates an engine around an injected registry.
    pub fn new(registry: ScenarioRegistry) -> Self {
        Self { registry }
    }

    /// Creates an engine pre-loaded with the built-in presets.
    pub fn with_builtin_scenarios() -> Self {
        Self::new(ScenarioRegistry::with_builtin_presets())
    }

    /// Returns the injected registry.
    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Lists the registered scenario names, sorted.
    pub fn list_available_scenarios(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Returns the introspection view of a registered scenario.
    pub fn get_scenario_info(&self, name: &str) -> Result<ScenarioInfo, EngineError> {
        let template = self.registry.get(name)?;
        Ok(ScenarioInfo {
            name: template.name().to_string(),
            description: template.description().to_string(),
            variables: template.variables().to_vec(),
            distributions: template
                .variables()
                .iter()
                .map(|v| (v.name.clone(), v.distribution.kind()))
                .collect(),
            default_correlation: template.default_correlation().clone(),
        })
    }

    /// Lists the supported distribution families.
    pub fn list_available_distributions(&self) -> &'static [DistributionKind] {
        &DistributionKind::ALL
    }

    // ------------------------------------------------------------------
    // Simulation entry points
    // ------------------------------------------------------------------

    /// Runs a fully custom simulation.
    ///
    /// A caller-supplied correlation matrix is factorised strictly: if it
    /// is not positive semi-definite the call fails with
    /// `NonPositiveDefinite` rather than silently simulating an adjusted
    /// structure. With no matrix supplied the variables are independent.
    pub fn run_custom_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResult, EngineError> {
        tracing::info!(
            variables = request.variables.len(),
            iterations = request.config.iterations(),
            "running custom simulation"
        );
        let factorized = prepare(
            &request.variables,
            request.correlation.as_ref(),
            RepairPolicy::Strict,
            &request.config,
            request.loss.as_ref(),
        )?;
        execute(
            &request.variables,
            &factorized,
            &request.config,
            request.loss.as_ref(),
        )
    }

    /// Runs a named scenario with caller overrides merged on top.
    ///
    /// Fails with `ScenarioNotFound` for unknown names. When
    /// `config.time_steps()` is set the run samples a time series and the
    /// result reduces the final step (the horizon outcome); otherwise a
    /// single pass is analysed.
    pub fn run_scenario_simulation(
        &self,
        name: &str,
        overrides: &ScenarioOverrides,
        config: &SimulationConfig,
    ) -> Result<SimulationResult, EngineError> {
        let template = self.registry.get(name)?;
        tracing::info!(
            scenario = name,
            iterations = config.iterations(),
            time_steps = config.time_steps(),
            "running scenario simulation"
        );
        let variables = merge_variables(template, overrides);
        let (correlation, policy) = resolve_correlation(template, overrides);
        let loss = overrides.loss.as_ref();
        let factorized = prepare(&variables, Some(&correlation), policy, config, loss)?;
        execute(&variables, &factorized, config, loss)
    }

    /// Runs a named scenario as a time series and returns the raw per-step
    /// sample sets.
    ///
    /// This is one of the two explicit raw-sample entry points; everywhere
    /// else samples stay ephemeral inside the engine call.
    pub fn run_time_series_simulation(
        &self,
        name: &str,
        overrides: &ScenarioOverrides,
        config: &SimulationConfig,
    ) -> Result<Vec<SampleSet>, EngineError> {
        let Some(time_steps) = config.time_steps() else {
            return Err(ConfigError::TimeStepsRequired.into());
        };
        let template = self.registry.get(name)?;
        tracing::info!(
            scenario = name,
            iterations = config.iterations(),
            time_steps,
            "running time-series simulation"
        );
        let variables = merge_variables(template, overrides);
        let (correlation, policy) = resolve_correlation(template, overrides);
        let factorized = prepare(
            &variables,
            Some(&correlation),
            policy,
            config,
            overrides.loss.as_ref(),
        )?;
        let rng = seeded_rng(config);
        let series = run_time_series(
            &variables,
            &factorized.factor,
            config.iterations(),
            time_steps,
            &rng,
        )?;
        Ok(series)
    }

    /// Draws one raw correlated sample set for a custom request.
    ///
    /// The second explicit raw-sample entry point, for callers that want
    /// the draws themselves rather than the reduced result.
    pub fn draw_samples(&self, request: &SimulationRequest) -> Result<SampleSet, EngineError> {
        let factorized = prepare(
            &request.variables,
            request.correlation.as_ref(),
            RepairPolicy::Strict,
            &request.config,
            request.loss.as_ref(),
        )?;
        let rng = seeded_rng(&request.config);
        let set = run_single_pass(
            &request.variables,
            &factorized.factor,
            request.config.iterations(),
            &rng,
        )?;
        Ok(set)
    }
}

// ----------------------------------------------------------------------
// Pipeline helpers
// ----------------------------------------------------------------------

/// Merges override variables onto a template by name (replace or append).
fn merge_variables(template: &ScenarioTemplate, overrides: &ScenarioOverrides) -> Vec<VariableSpec> {
    let mut variables = template.variables().to_vec();
    for override_var in &overrides.variables {
        if let Some(existing) = variables.iter_mut().find(|v| v.name == override_var.name) {
            *existing = override_var.clone();
        } else {
            variables.push(override_var.clone());
        }
    }
    variables
}

/// Picks the correlation matrix and the repair policy it is entitled to.
///
/// A caller override is strict; the template default is engine-owned and
/// eligible for clipping repair.
fn resolve_correlation(
    template: &ScenarioTemplate,
    overrides: &ScenarioOverrides,
) -> (CorrelationMatrix, RepairPolicy) {
    match &overrides.correlation {
        Some(matrix) => (matrix.clone(), RepairPolicy::Strict),
        None => (
            template.default_correlation().clone(),
            RepairPolicy::Clip,
        ),
    }
}

/// Fail-fast request validation and matrix factorisation.
fn prepare(
    variables: &[VariableSpec],
    correlation: Option<&CorrelationMatrix>,
    policy: RepairPolicy,
    config: &SimulationConfig,
    loss: Option<&LossSpec>,
) -> Result<Factorized, EngineError> {
    config.validate()?;
    validate_variables(variables)?;

    if let Some(loss) = loss {
        loss.validate()?;
        if let Some(name) = &loss.variable {
            if !variables.iter().any(|v| &v.name == name) {
                return Err(ConfigError::UnknownLossVariable { name: name.clone() }.into());
            }
        }
    }

    match correlation {
        Some(matrix) => {
            if matrix.dim() != variables.len() {
                return Err(ConfigError::CorrelationShape {
                    got: matrix.dim(),
                    expected: variables.len(),
                }
                .into());
            }
            Ok(factorize(matrix, policy)?)
        }
        // Independent variables: the identity always factorises
        None => Ok(factorize(
            &CorrelationMatrix::identity(variables.len()),
            RepairPolicy::Strict,
        )?),
    }
}

/// Builds the run RNG, drawing a recorded seed from entropy when the
/// config leaves it open.
fn seeded_rng(config: &SimulationConfig) -> SimRng {
    match config.seed() {
        Some(seed) => SimRng::from_seed(seed),
        None => SimRng::from_entropy(),
    }
}

/// Samples and reduces one run.
fn execute(
    variables: &[VariableSpec],
    factorized: &Factorized,
    config: &SimulationConfig,
    loss: Option<&LossSpec>,
) -> Result<SimulationResult, EngineError> {
    let rng = seeded_rng(config);

    let sample_set = match config.time_steps() {
        Some(time_steps) => {
            let mut series = run_time_series(
                variables,
                &factorized.factor,
                config.iterations(),
                time_steps,
                &rng,
            )?;
            // time_steps >= 1 was validated, so the series is non-empty
            match series.pop() {
                Some(final_step) => final_step,
                None => return Err(ConfigError::TimeStepsRequired.into()),
            }
        }
        None => run_single_pass(variables, &factorized.factor, config.iterations(), &rng)?,
    };

    analyze(&sample_set, config, loss, factorized.adjusted, rng.seed())
}

/// Reduces a sample set to the outbound result.
fn analyze(
    set: &SampleSet,
    config: &SimulationConfig,
    loss: Option<&LossSpec>,
    matrix_adjusted: bool,
    seed: u64,
) -> Result<SimulationResult, EngineError> {
    let loss_variable = loss
        .and_then(|l| l.variable.clone())
        .unwrap_or_else(|| set.names()[0].clone());
    let threshold = loss.map_or(0.0, |l| l.threshold);

    let loss_column = set
        .column(&loss_variable)
        .ok_or_else(|| ConfigError::UnknownLossVariable {
            name: loss_variable.clone(),
        })?;

    let result = SimulationResult {
        statistics: summarize_set(set),
        confidence_intervals: intervals_for_set(set, config.confidence_level()),
        risk_metrics: compute_risk_metrics(loss_column, &loss_variable, threshold),
        convergence: convergence_analysis(loss_column, config.convergence_tolerance()),
        matrix_adjusted,
        iterations: set.iterations(),
        seed,
    };

    tracing::debug!(
        %loss_variable,
        converged = result.convergence.converged,
        matrix_adjusted,
        "simulation reduced"
    );

    Ok(result)
}
